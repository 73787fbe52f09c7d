//! Core data types: quality labels, joined store rows and per-metric series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Confidence label attached to every reading.
///
/// Variants are declared in ascending order so the derived `Ord` matches
/// `poor < questionable < good < excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Poor,
    Questionable,
    Good,
    Excellent,
}

impl Quality {
    /// All labels, lowest first.
    pub const ALL: [Quality; 4] = [
        Quality::Poor,
        Quality::Questionable,
        Quality::Good,
        Quality::Excellent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Poor => "poor",
            Quality::Questionable => "questionable",
            Quality::Good => "good",
            Quality::Excellent => "excellent",
        }
    }

    /// Every label at or above `self`, lowest first.
    pub fn at_least(self) -> Vec<Quality> {
        Self::ALL.into_iter().filter(|q| *q >= self).collect()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four quality labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown quality label '{0}'")]
pub struct UnknownQuality(pub String);

impl FromStr for Quality {
    type Err = UnknownQuality;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poor" => Ok(Quality::Poor),
            "questionable" => Ok(Quality::Questionable),
            "good" => Ok(Quality::Good),
            "excellent" => Ok(Quality::Excellent),
            _ => Err(UnknownQuality(s.to_string())),
        }
    }
}

/// One row of `climate_data` joined with its location and metric, as handed
/// over by the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateRow {
    #[serde(default)]
    pub id: Option<i64>,
    pub location_id: i64,
    pub location_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    #[serde(rename = "metric")]
    pub metric_name: String,
    pub value: f64,
    pub unit: String,
    pub quality: Quality,
}

/// A single `(date, value, quality)` point of a metric series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
    pub quality: Quality,
}

/// All filtered readings of one metric.
///
/// The engines in [`crate::analyzers`] that depend on time order expect the
/// points sorted by date; call [`MetricSeries::sort_by_date`] first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSeries {
    pub unit: String,
    pub points: Vec<Observation>,
}

impl MetricSeries {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, date: NaiveDate, value: f64, quality: Quality) {
        self.points.push(Observation {
            date,
            value,
            quality,
        });
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Stable sort, so same-day readings keep their store order.
    pub fn sort_by_date(&mut self) {
        self.points.sort_by_key(|p| p.date);
    }
}

/// Groups rows into one series per metric name.
///
/// If a metric appears with more than one unit, the unit of the last row wins.
pub fn group_by_metric(rows: &[ClimateRow]) -> BTreeMap<String, MetricSeries> {
    let mut grouped: BTreeMap<String, MetricSeries> = BTreeMap::new();

    for row in rows {
        let series = grouped.entry(row.metric_name.clone()).or_default();
        series.unit = row.unit.clone();
        series.push(row.date, row.value, row.quality);
    }

    grouped
}
