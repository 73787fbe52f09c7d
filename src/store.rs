//! Access to the external climate data store.
//!
//! The store hands out rows of `climate_data` already joined with their
//! location and metric. Two backends read a CSV export of that join: one from
//! the local filesystem, one over HTTP.

use crate::fetch::{HttpClient, fetch_bytes};
use crate::filters::FilterDescriptor;
use crate::model::ClimateRow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Read-only source of joined climate rows.
#[async_trait]
pub trait ClimateStore: Send + Sync {
    /// Returns the rows matching `filter`, ordered by date ascending.
    async fn fetch_rows(&self, filter: &FilterDescriptor) -> Result<Vec<ClimateRow>>;
}

/// Deserializes a CSV export with a header row.
///
/// Expected columns: `id` (optional), `location_id`, `location_name`,
/// `latitude`, `longitude`, `date`, `metric`, `value`, `unit`, `quality`.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ClimateRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let record: ClimateRow =
            result.with_context(|| format!("Malformed climate row at record {}", line + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Applies the filter and the store's date ordering.
fn select(rows: Vec<ClimateRow>, filter: &FilterDescriptor) -> Vec<ClimateRow> {
    let total = rows.len();
    let mut selected = filter.apply(rows);
    selected.sort_by_key(|r| r.date);
    debug!(total, selected = selected.len(), "Rows filtered");
    selected
}

pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ClimateStore for CsvStore {
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    async fn fetch_rows(&self, filter: &FilterDescriptor) -> Result<Vec<ClimateRow>> {
        let path = self.path.clone();
        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<ClimateRow>> {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open '{}'", path.display()))?;
            read_rows(file)
        })
        .await??;

        info!(rows = rows.len(), "Loaded climate export");
        Ok(select(rows, filter))
    }
}

pub struct HttpCsvStore<C> {
    client: C,
    url: String,
}

impl<C: HttpClient> HttpCsvStore<C> {
    pub fn new(client: C, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> ClimateStore for HttpCsvStore<C> {
    #[tracing::instrument(skip_all, fields(url = %self.url))]
    async fn fetch_rows(&self, filter: &FilterDescriptor) -> Result<Vec<ClimateRow>> {
        let bytes = fetch_bytes(&self.client, &self.url).await?;
        let rows = read_rows(bytes.as_slice())?;

        info!(rows = rows.len(), "Downloaded climate export");
        Ok(select(rows, filter))
    }
}
