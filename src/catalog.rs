//! Location and metric listings derived from the joined rows.

use crate::model::ClimateRow;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricInfo {
    pub name: String,
    pub unit: String,
}

/// Distinct locations ordered by id.
pub fn locations(rows: &[ClimateRow]) -> Vec<Location> {
    let mut by_id = BTreeMap::new();
    for row in rows {
        by_id.entry(row.location_id).or_insert_with(|| Location {
            id: row.location_id,
            name: row.location_name.clone(),
            latitude: row.latitude,
            longitude: row.longitude,
        });
    }
    by_id.into_values().collect()
}

/// Distinct metrics ordered by name; the last unit seen wins.
pub fn metrics(rows: &[ClimateRow]) -> Vec<MetricInfo> {
    let mut by_name = BTreeMap::new();
    for row in rows {
        by_name.insert(row.metric_name.clone(), row.unit.clone());
    }
    by_name
        .into_iter()
        .map(|(name, unit)| MetricInfo { name, unit })
        .collect()
}
