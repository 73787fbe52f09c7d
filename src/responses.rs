//! JSON envelopes returned for each query.

use crate::model::ClimateRow;
use serde::Serialize;

/// Fixed page size reported in listing metadata.
pub const PER_PAGE: usize = 50;

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ListingMeta {
    pub total_count: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Filtered readings plus listing metadata.
#[derive(Debug, Serialize)]
pub struct ClimateListing {
    pub data: Vec<ClimateRow>,
    pub meta: ListingMeta,
}

impl ClimateListing {
    pub fn new(rows: Vec<ClimateRow>) -> Self {
        let meta = ListingMeta {
            total_count: rows.len(),
            page: 1,
            per_page: PER_PAGE,
        };
        Self { data: rows, meta }
    }
}
