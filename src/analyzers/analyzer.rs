use crate::analyzers::aggregate::aggregate_metric;
use crate::analyzers::anomaly::detect_anomalies;
use crate::analyzers::seasonality::detect_seasonality;
use crate::analyzers::trend::calculate_trend;
use crate::analyzers::types::{MetricSummary, MetricTrends};
use crate::analyzers::weights::QualityWeights;
use crate::model::{ClimateRow, MetricSeries, group_by_metric};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Per-metric summary statistics over already-filtered rows.
///
/// Metrics without readings never appear in the result.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn summarize(rows: &[ClimateRow], weights: &QualityWeights) -> BTreeMap<String, MetricSummary> {
    let mut result = BTreeMap::new();

    for (metric, series) in group_by_metric(rows) {
        if let Some(summary) = aggregate_metric(&series, weights) {
            debug!(
                metric = %metric,
                readings = series.len(),
                weighted_avg = summary.weighted_avg,
                "Metric summarized"
            );
            result.insert(metric, summary);
        }
    }

    info!(metrics = result.len(), "Summary complete");
    result
}

/// Runs trend, anomaly and seasonality analysis for one metric.
///
/// Sorts the series by date first, since every engine here depends on time order.
pub fn analyze_series(mut series: MetricSeries) -> MetricTrends {
    series.sort_by_date();

    MetricTrends {
        trend: calculate_trend(&series),
        anomalies: detect_anomalies(&series),
        seasonality: detect_seasonality(&series),
    }
}

/// Per-metric trend analysis over already-filtered rows.
#[tracing::instrument(skip_all, fields(rows = rows.len()))]
pub fn analyze_trends(rows: &[ClimateRow]) -> BTreeMap<String, MetricTrends> {
    let mut result = BTreeMap::new();

    for (metric, series) in group_by_metric(rows) {
        if series.is_empty() {
            continue;
        }

        let readings = series.len();
        let trends = analyze_series(series);
        debug!(
            metric = %metric,
            readings,
            direction = ?trends.trend.direction,
            anomalies = trends.anomalies.len(),
            seasonal = trends.seasonality.detected,
            "Metric analyzed"
        );
        result.insert(metric, trends);
    }

    info!(metrics = result.len(), "Trend analysis complete");
    result
}
