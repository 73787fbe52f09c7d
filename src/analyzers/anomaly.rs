use crate::analyzers::types::Anomaly;
use crate::analyzers::utility::{mean, round_to, stddev};
use crate::model::MetricSeries;

/// Readings further than this many standard deviations from the mean are flagged.
pub const ANOMALY_THRESHOLD: f64 = 2.0;

const MIN_ANOMALY_POINTS: usize = 3;

/// Flags readings whose z-score (population standard deviation) exceeds
/// [`ANOMALY_THRESHOLD`], most extreme first.
///
/// Series with fewer than three points or no spread yield no anomalies.
pub fn detect_anomalies(series: &MetricSeries) -> Vec<Anomaly> {
    if series.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }

    let values = series.values();
    let avg = mean(&values);
    let sd = stddev(&values, avg);

    if sd == 0.0 {
        return Vec::new();
    }

    let mut anomalies: Vec<Anomaly> = series
        .points
        .iter()
        .filter_map(|p| {
            let deviation = (p.value - avg).abs() / sd;
            (deviation > ANOMALY_THRESHOLD).then(|| Anomaly {
                date: p.date,
                value: round_to(p.value, 1),
                deviation: round_to(deviation, 2),
                quality: p.quality,
            })
        })
        .collect();

    // Stable sort: equal deviations keep series order.
    anomalies.sort_by(|a, b| b.deviation.total_cmp(&a.deviation));

    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{daily_series, date};
    use crate::model::Quality;

    #[test]
    fn test_single_outlier() {
        let series = daily_series(
            "2025-01-01",
            &[20.0, 21.0, 19.0, 20.0, 21.0, 19.0, 50.0],
            Quality::Good,
        );
        let anomalies = detect_anomalies(&series);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].value, 50.0);
        assert_eq!(anomalies[0].date, date("2025-01-07"));
        assert_eq!(anomalies[0].deviation, 2.44);
        assert_eq!(anomalies[0].quality, Quality::Good);
    }

    #[test]
    fn test_constant_series_has_no_anomalies() {
        for len in [3, 4, 10, 50] {
            let series = daily_series("2025-01-01", &vec![5.0; len], Quality::Good);
            assert!(detect_anomalies(&series).is_empty());
        }
    }

    #[test]
    fn test_too_few_points() {
        let series = daily_series("2025-01-01", &[1.0, 1000.0], Quality::Good);
        assert!(detect_anomalies(&series).is_empty());
    }

    #[test]
    fn test_sorted_by_deviation_descending() {
        let mut values = vec![10.0; 30];
        values[5] = 40.0;
        values[20] = -50.0;
        let series = daily_series("2025-01-01", &values, Quality::Poor);

        let anomalies = detect_anomalies(&series);

        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].value, -50.0);
        assert_eq!(anomalies[1].value, 40.0);
        assert!(anomalies[0].deviation > anomalies[1].deviation);
    }

    #[test]
    fn test_order_does_not_change_result_set() {
        let series = daily_series(
            "2025-01-01",
            &[20.0, 50.0, 21.0, 19.0, 20.0, 21.0, 19.0],
            Quality::Good,
        );
        let mut reversed = series.clone();
        reversed.points.reverse();

        let a = detect_anomalies(&series);
        let b = detect_anomalies(&reversed);

        assert_eq!(a.len(), 1);
        assert_eq!(a[0].date, b[0].date);
        assert_eq!(a[0].deviation, b[0].deviation);
    }

    #[test]
    fn test_value_rounded_to_one_decimal() {
        let series = daily_series(
            "2025-01-01",
            &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 9.876],
            Quality::Excellent,
        );
        let anomalies = detect_anomalies(&series);

        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].value, 9.9);
    }
}
