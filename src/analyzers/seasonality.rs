//! Season-bucketed variance comparison.
//!
//! Values are grouped by season (pooled across years). A yearly cycle is
//! reported when the variance between season means clearly exceeds the
//! average variance inside each season.

use crate::analyzers::trend::classify_slope;
use crate::analyzers::types::{Season, SeasonPattern, Seasonality, TrendDirection};
use crate::analyzers::utility::{linear_fit, mean, round_to, variance};
use crate::model::MetricSeries;
use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};

const MIN_YEARS: usize = 2;
const MIN_SEASON_VALUES: usize = 2;
const MIN_QUALIFYING_SEASONS: usize = 3;

/// Between-season variance must exceed this multiple of within-season variance.
const DETECTION_RATIO: f64 = 2.0;

/// Years of data a season needs before its own trend is fitted.
const MIN_SEASON_TREND_YEARS: usize = 3;

/// Yearly-mean slopes below this magnitude count as stable.
const STABLE_SEASON_SLOPE: f64 = 0.1;

pub const YEARLY_PERIOD: &str = "yearly";

struct SeasonStats {
    mean: f64,
    variance: f64,
    yearly_means: Vec<(i32, f64)>,
}

/// Detects a recurring seasonal pattern in a multi-year series.
///
/// Quality labels are ignored. Every rejected gate returns
/// [`Seasonality::not_detected`].
pub fn detect_seasonality(series: &MetricSeries) -> Seasonality {
    if series.is_empty() {
        return Seasonality::not_detected();
    }

    let years: BTreeSet<i32> = series.points.iter().map(|p| p.date.year()).collect();
    if years.len() < MIN_YEARS {
        return Seasonality::not_detected();
    }

    let mut buckets: BTreeMap<Season, BTreeMap<i32, Vec<f64>>> = BTreeMap::new();
    for p in &series.points {
        buckets
            .entry(Season::from_month(p.date.month()))
            .or_default()
            .entry(p.date.year())
            .or_default()
            .push(p.value);
    }

    let mut qualifying: BTreeMap<Season, SeasonStats> = BTreeMap::new();
    for (season, by_year) in &buckets {
        let pooled: Vec<f64> = by_year.values().flatten().copied().collect();
        if pooled.len() < MIN_SEASON_VALUES {
            continue;
        }

        let season_mean = mean(&pooled);
        let yearly_means = by_year
            .iter()
            .map(|(year, values)| (*year, mean(values)))
            .collect();

        qualifying.insert(
            *season,
            SeasonStats {
                mean: season_mean,
                variance: variance(&pooled, season_mean),
                yearly_means,
            },
        );
    }

    if qualifying.len() < MIN_QUALIFYING_SEASONS {
        return Seasonality::not_detected();
    }

    let season_means: Vec<f64> = qualifying.values().map(|s| s.mean).collect();
    let between_variance = variance(&season_means, mean(&season_means));

    let within: Vec<f64> = qualifying.values().map(|s| s.variance).collect();
    let avg_within_variance = mean(&within);

    let (detected, confidence) = if avg_within_variance == 0.0 {
        let detected = between_variance > 0.0;
        (detected, if detected { 1.0 } else { 0.0 })
    } else if between_variance > DETECTION_RATIO * avg_within_variance {
        (true, (between_variance / (avg_within_variance * 10.0)).min(1.0))
    } else {
        (false, 0.0)
    };

    if !detected {
        return Seasonality::not_detected();
    }

    let pattern = qualifying
        .iter()
        .map(|(season, stats)| {
            (
                *season,
                SeasonPattern {
                    avg: round_to(stats.mean, 1),
                    trend: season_trend(&stats.yearly_means),
                },
            )
        })
        .collect();

    Seasonality {
        detected: true,
        period: YEARLY_PERIOD.to_string(),
        confidence,
        pattern: Some(pattern),
    }
}

/// Direction of a season's yearly means over time. Defaults to `Stable` with
/// fewer than [`MIN_SEASON_TREND_YEARS`] years.
fn season_trend(yearly_means: &[(i32, f64)]) -> TrendDirection {
    if yearly_means.len() < MIN_SEASON_TREND_YEARS {
        return TrendDirection::Stable;
    }

    let years: Vec<f64> = yearly_means.iter().map(|(y, _)| *y as f64).collect();
    let means: Vec<f64> = yearly_means.iter().map(|(_, m)| *m).collect();

    classify_slope(linear_fit(&years, &means).slope, STABLE_SEASON_SLOPE)
}
