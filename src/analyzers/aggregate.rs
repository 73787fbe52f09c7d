use crate::analyzers::types::{MetricSummary, QualityDistribution};
use crate::analyzers::utility::mean;
use crate::analyzers::weights::QualityWeights;
use crate::model::{MetricSeries, Quality};

/// Aggregates a [`MetricSeries`] into a [`MetricSummary`].
///
/// Order of the points does not matter. Returns `None` for an empty series so
/// that callers omit the metric rather than report zeroed statistics.
pub fn aggregate_metric(series: &MetricSeries, weights: &QualityWeights) -> Option<MetricSummary> {
    if series.is_empty() {
        return None;
    }

    let values = series.values();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut weighted_total = 0.0;
    let mut weight_sum = 0.0;
    for point in &series.points {
        let weight = weights.weight(point.quality);
        weighted_total += point.value * weight;
        weight_sum += weight;
    }

    let weighted_avg = if weight_sum == 0.0 {
        0.0
    } else {
        weighted_total / weight_sum
    };

    Some(MetricSummary {
        min,
        max,
        avg: mean(&values),
        weighted_avg,
        unit: series.unit.clone(),
        quality_distribution: quality_distribution(series),
    })
}

/// Share of each quality label in the series. All zeros for an empty series.
pub fn quality_distribution(series: &MetricSeries) -> QualityDistribution {
    let total = series.len();
    let share = |quality: Quality| {
        if total == 0 {
            return 0.0;
        }
        let count = series.points.iter().filter(|p| p.quality == quality).count();
        count as f64 / total as f64
    };

    QualityDistribution {
        excellent: share(Quality::Excellent),
        good: share(Quality::Good),
        questionable: share(Quality::Questionable),
        poor: share(Quality::Poor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{daily_series, date};

    #[test]
    fn test_empty_series_is_omitted() {
        let series = MetricSeries::new("celsius");
        assert_eq!(aggregate_metric(&series, &QualityWeights::default()), None);
    }

    #[test]
    fn test_basic_stats() {
        let series = daily_series("2025-01-01", &[12.0, 8.0, 10.0], Quality::Good);
        let summary = aggregate_metric(&series, &QualityWeights::default()).unwrap();

        assert_eq!(summary.min, 8.0);
        assert_eq!(summary.max, 12.0);
        assert_eq!(summary.avg, 10.0);
        assert_eq!(summary.unit, "celsius");
    }

    #[test]
    fn test_all_excellent_weighted_avg_equals_avg() {
        let series = daily_series("2025-01-01", &[3.0, 7.5, 11.0, 4.25], Quality::Excellent);
        let summary = aggregate_metric(&series, &QualityWeights::default()).unwrap();

        assert!((summary.weighted_avg - summary.avg).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_avg_favors_better_quality() {
        let mut series = MetricSeries::new("mm");
        series.push(date("2025-01-01"), 10.0, Quality::Excellent);
        series.push(date("2025-01-02"), 20.0, Quality::Poor);

        let summary = aggregate_metric(&series, &QualityWeights::default()).unwrap();

        // (10 * 1.0 + 20 * 0.3) / 1.3
        assert!((summary.weighted_avg - 16.0 / 1.3).abs() < 1e-12);
        assert_eq!(summary.avg, 15.0);
    }

    #[test]
    fn test_quality_distribution_sums_to_one() {
        let mut series = MetricSeries::new("%");
        let qualities = [
            Quality::Excellent,
            Quality::Good,
            Quality::Good,
            Quality::Questionable,
            Quality::Poor,
            Quality::Poor,
            Quality::Poor,
        ];
        for (i, q) in qualities.iter().enumerate() {
            series.push(date("2025-02-01") + chrono::Duration::days(i as i64), 50.0, *q);
        }

        let d = quality_distribution(&series);
        let sum = d.excellent + d.good + d.questionable + d.poor;

        assert!((sum - 1.0).abs() < 1e-9);
        assert!((d.poor - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_labels_report_zero() {
        let series = daily_series("2025-01-01", &[1.0, 2.0], Quality::Good);
        let d = quality_distribution(&series);

        assert_eq!(d.good, 1.0);
        assert_eq!(d.excellent, 0.0);
        assert_eq!(d.questionable, 0.0);
        assert_eq!(d.poor, 0.0);
    }

    #[test]
    fn test_order_independent() {
        let forward = daily_series("2025-01-01", &[5.0, 1.0, 9.0], Quality::Questionable);
        let mut reversed = forward.clone();
        reversed.points.reverse();

        let w = QualityWeights::default();
        let a = aggregate_metric(&forward, &w).unwrap();
        let b = aggregate_metric(&reversed, &w).unwrap();

        assert_eq!(a.min, b.min);
        assert_eq!(a.max, b.max);
        assert!((a.weighted_avg - b.weighted_avg).abs() < 1e-12);
    }
}
