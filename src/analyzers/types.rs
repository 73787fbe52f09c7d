//! Data types produced by the analysis pipeline.

use crate::model::Quality;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fraction of a series' readings at each quality label.
///
/// All four keys are always present; for a non-empty series they sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityDistribution {
    pub excellent: f64,
    pub good: f64,
    pub questionable: f64,
    pub poor: f64,
}

/// Summary statistics for a single metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub weighted_avg: f64,
    pub unit: String,
    pub quality_distribution: QualityDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

/// Linear trend of a metric, with the rate expressed per 30 days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub rate: f64,
    pub unit: String,
    pub confidence: f64,
}

/// A reading more than two standard deviations away from its metric's mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    pub date: NaiveDate,
    pub value: f64,
    pub deviation: f64,
    pub quality: Quality,
}

/// Meteorological season, ordered winter → fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Maps a calendar month (1-12) to its season.
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonPattern {
    pub avg: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seasonality {
    pub detected: bool,
    pub period: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<BTreeMap<Season, SeasonPattern>>,
}

impl Seasonality {
    pub fn not_detected() -> Self {
        Seasonality {
            detected: false,
            period: "none".to_string(),
            confidence: 0.0,
            pattern: None,
        }
    }
}

/// Trend, anomalies and seasonality for one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTrends {
    pub trend: Trend,
    pub anomalies: Vec<Anomaly>,
    pub seasonality: Seasonality,
}
