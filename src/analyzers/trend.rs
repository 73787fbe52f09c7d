use crate::analyzers::types::{Trend, TrendDirection};
use crate::analyzers::utility::{linear_fit, mean, round_to};
use crate::model::MetricSeries;

/// Minimum number of points for a meaningful fit.
pub const MIN_TREND_POINTS: usize = 3;

/// Slopes (per day) smaller than this in magnitude count as flat.
const STABLE_SLOPE_PER_DAY: f64 = 0.01;

const DAYS_PER_MONTH: f64 = 30.0;

/// Fits a least-squares line through a date-ordered series.
///
/// The x axis is days since the first reading. `rate` is the slope scaled to
/// 30 days and `confidence` is the fit's R², both rounded to 2 decimals.
pub fn calculate_trend(series: &MetricSeries) -> Trend {
    let unit = format!("{}/month", series.unit);

    if series.len() < MIN_TREND_POINTS {
        return Trend {
            direction: TrendDirection::InsufficientData,
            rate: 0.0,
            unit,
            confidence: 0.0,
        };
    }

    let first = series.points[0].date;
    let days: Vec<f64> = series
        .points
        .iter()
        .map(|p| (p.date - first).num_days() as f64)
        .collect();
    let values = series.values();

    let fit = linear_fit(&days, &values);

    let value_mean = mean(&values);
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in days.iter().zip(&values) {
        ss_res += (y - fit.predict(*x)).powi(2);
        ss_tot += (y - value_mean).powi(2);
    }

    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
    let r_squared = r_squared.clamp(0.0, 1.0);

    Trend {
        direction: classify_slope(fit.slope, STABLE_SLOPE_PER_DAY),
        rate: round_to(fit.slope * DAYS_PER_MONTH, 2),
        unit,
        confidence: round_to(r_squared, 2),
    }
}

/// `Stable` below `threshold`, otherwise the sign of the slope.
pub fn classify_slope(slope: f64, threshold: f64) -> TrendDirection {
    if slope.abs() < threshold {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{daily_series, date};
    use crate::model::Quality;

    #[test]
    fn test_insufficient_data() {
        let series = daily_series("2025-01-01", &[10.0, 20.0], Quality::Good);
        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::InsufficientData);
        assert_eq!(trend.rate, 0.0);
        assert_eq!(trend.confidence, 0.0);
        assert_eq!(trend.unit, "celsius/month");
    }

    #[test]
    fn test_empty_series() {
        let trend = calculate_trend(&MetricSeries::new("mm"));
        assert_eq!(trend.direction, TrendDirection::InsufficientData);
        assert_eq!(trend.unit, "mm/month");
    }

    #[test]
    fn test_three_point_line() {
        let series = daily_series("2025-01-01", &[10.0, 11.0, 12.0], Quality::Excellent);
        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.rate, 30.0);
        assert_eq!(trend.confidence, 1.0);
    }

    #[test]
    fn test_perfect_linear_series() {
        let series = daily_series("2025-03-01", &[10.0, 12.0, 14.0, 16.0, 18.0], Quality::Good);
        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::Increasing);
        assert_eq!(trend.confidence, 1.0);
        assert_eq!(trend.rate, 60.0);
    }

    #[test]
    fn test_decreasing() {
        let series = daily_series("2025-03-01", &[9.0, 7.0, 5.0, 3.0], Quality::Good);
        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::Decreasing);
        assert_eq!(trend.rate, -60.0);
    }

    #[test]
    fn test_constant_series_is_stable_with_zero_confidence() {
        let series = daily_series("2025-03-01", &[4.0, 4.0, 4.0, 4.0], Quality::Good);
        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.rate, 0.0);
        assert_eq!(trend.confidence, 0.0);
    }

    #[test]
    fn test_small_slope_is_stable() {
        // 0.005 per day
        let mut series = MetricSeries::new("celsius");
        series.push(date("2025-01-01"), 20.0, Quality::Good);
        series.push(date("2025-01-11"), 20.05, Quality::Good);
        series.push(date("2025-01-21"), 20.1, Quality::Good);

        let trend = calculate_trend(&series);

        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.rate, 0.15);
    }

    #[test]
    fn test_uses_calendar_day_offsets() {
        // Uneven spacing: slope is 1/day, not 1/sample.
        let mut series = MetricSeries::new("celsius");
        series.push(date("2025-01-01"), 0.0, Quality::Good);
        series.push(date("2025-01-03"), 2.0, Quality::Good);
        series.push(date("2025-01-10"), 9.0, Quality::Good);

        let trend = calculate_trend(&series);

        assert_eq!(trend.rate, 30.0);
        assert_eq!(trend.confidence, 1.0);
    }

    #[test]
    fn test_idempotent() {
        let series = daily_series("2025-01-01", &[3.0, 9.0, 4.0, 8.0, 5.0], Quality::Good);
        assert_eq!(calculate_trend(&series), calculate_trend(&series));
    }
}
