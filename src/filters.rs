//! Filter resolution shared by every query.
//!
//! Raw, optional string parameters are normalized into a [`FilterDescriptor`].
//! A quality threshold is inclusive upward: `good` keeps `good` and
//! `excellent` readings.

use crate::model::{ClimateRow, Quality};
use chrono::NaiveDate;
use clap::Args;
use thiserror::Error;
use tracing::warn;

/// Raw filter inputs exactly as received from the caller.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterParams {
    /// Only readings from this location id
    #[arg(long)]
    pub location_id: Option<String>,

    /// Only readings of this metric (e.g. "temperature")
    #[arg(long)]
    pub metric: Option<String>,

    /// Inclusive lower date bound, YYYY-MM-DD
    #[arg(long)]
    pub start_date: Option<String>,

    /// Inclusive upper date bound, YYYY-MM-DD
    #[arg(long)]
    pub end_date: Option<String>,

    /// Minimum quality: poor, questionable, good or excellent
    #[arg(long)]
    pub quality_threshold: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid location_id '{0}'")]
    InvalidLocationId(String),

    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

/// Canonical filter. `allowed_qualities` is `None` when no quality filter applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterDescriptor {
    pub location_id: Option<i64>,
    pub metric_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub quality_threshold: Option<Quality>,
    pub allowed_qualities: Option<Vec<Quality>>,
}

/// Expands a threshold label into the set of accepted labels.
///
/// Unknown labels yield `None`, which disables quality filtering.
pub fn allowed_qualities(threshold: &str) -> Option<Vec<Quality>> {
    threshold.parse::<Quality>().ok().map(Quality::at_least)
}

/// Empty strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Normalizes raw parameters into a [`FilterDescriptor`].
pub fn resolve(params: &FilterParams) -> Result<FilterDescriptor, FilterError> {
    let location_id = present(&params.location_id)
        .map(|s| {
            s.trim()
                .parse::<i64>()
                .map_err(|_| FilterError::InvalidLocationId(s.to_string()))
        })
        .transpose()?;

    let start_date = present(&params.start_date)
        .map(|s| parse_date("start_date", s))
        .transpose()?;
    let end_date = present(&params.end_date)
        .map(|s| parse_date("end_date", s))
        .transpose()?;

    let allowed = present(&params.quality_threshold).and_then(|raw| {
        let allowed = allowed_qualities(raw);
        if allowed.is_none() {
            // Unrecognized thresholds are ignored and the query proceeds unfiltered.
            warn!(quality_threshold = raw, "Unknown quality threshold, quality filter dropped");
        }
        allowed
    });
    // The expansion is lowest first, so its head is the threshold itself.
    let quality_threshold = allowed.as_ref().and_then(|a| a.first().copied());

    Ok(FilterDescriptor {
        location_id,
        metric_name: present(&params.metric).map(str::to_string),
        start_date,
        end_date,
        quality_threshold,
        allowed_qualities: allowed,
    })
}

impl FilterDescriptor {
    /// True when `row` satisfies every active constraint.
    pub fn matches(&self, row: &ClimateRow) -> bool {
        if let Some(id) = self.location_id {
            if row.location_id != id {
                return false;
            }
        }
        if let Some(metric) = &self.metric_name {
            if &row.metric_name != metric {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if row.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if row.date > end {
                return false;
            }
        }
        if let Some(allowed) = &self.allowed_qualities {
            if !allowed.contains(&row.quality) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, rows: Vec<ClimateRow>) -> Vec<ClimateRow> {
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}
