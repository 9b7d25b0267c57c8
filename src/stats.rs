use crate::cache::{AnalyticsCache, Fingerprint};
use serde::Serialize;
use std::cmp::Ordering;

/// Descriptive statistics over one cohort's scores. Degenerate inputs (empty,
/// single value) produce zeroed fields, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CohortStatistics {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub standard_deviation: f64,
    pub skewness: f64,
}

impl CohortStatistics {
    fn zeroed() -> Self {
        CohortStatistics {
            count: 0,
            mean: 0.0,
            median: 0.0,
            min: 0.0,
            max: 0.0,
            standard_deviation: 0.0,
            skewness: 0.0,
        }
    }
}

pub fn cohort_statistics(values: &[f64]) -> CohortStatistics {
    if values.is_empty() {
        return CohortStatistics::zeroed();
    }

    let count = values.len();
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    // Population variance: divide by N, not N-1.
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let standard_deviation = variance.sqrt();

    // Third standardized moment, population form. Sign carries the meaning:
    // a few very low scores in a high cohort pull it negative.
    let skewness = if standard_deviation < 1e-12 {
        0.0
    } else {
        values
            .iter()
            .map(|v| ((v - mean) / standard_deviation).powi(3))
            .sum::<f64>()
            / n
    };

    CohortStatistics {
        count,
        mean,
        median,
        min: sorted[0],
        max: sorted[count - 1],
        standard_deviation,
        skewness,
    }
}

/// Same computation routed through a caller-owned cache, keyed by a content
/// fingerprint of the cohort.
pub fn cached_cohort_statistics(
    cache: &mut AnalyticsCache<CohortStatistics>,
    values: &[f64],
) -> CohortStatistics {
    let key = Fingerprint::of_values(values);
    *cache.get_or_insert_with(key, || cohort_statistics(values))
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreBand {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

/// The five fixed report bands. Performance levels in `ranking` align with
/// these boundaries; change one and the other must follow.
pub const SCORE_BANDS: [ScoreBand; 5] = [
    ScoreBand { label: "90-100", min: 90.0, max: 100.0 },
    ScoreBand { label: "80-89", min: 80.0, max: 89.0 },
    ScoreBand { label: "70-79", min: 70.0, max: 79.0 },
    ScoreBand { label: "60-69", min: 60.0, max: 69.0 },
    ScoreBand { label: "0-59", min: 0.0, max: 59.0 },
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionBucket {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub percentage: u32,
}

fn band_index(value: f64) -> usize {
    if value >= 90.0 {
        0
    } else if value >= 80.0 {
        1
    } else if value >= 70.0 {
        2
    } else if value >= 60.0 {
        3
    } else {
        4
    }
}

/// Partition a cohort into the fixed bands. Percentages are rounded per band
/// independently; under adversarial inputs the total may come out 99 or 101,
/// which is preserved rather than reconciled.
pub fn distribution(values: &[f64]) -> Vec<DistributionBucket> {
    let mut counts = [0usize; SCORE_BANDS.len()];
    for v in values {
        counts[band_index(*v)] += 1;
    }
    let total = values.len();

    SCORE_BANDS
        .iter()
        .zip(counts.iter())
        .map(|(band, count)| {
            let percentage = if total > 0 {
                (*count as f64 / total as f64 * 100.0).round() as u32
            } else {
                0
            };
            DistributionBucket {
                label: band.label,
                min: band.min,
                max: band.max,
                count: *count,
                percentage,
            }
        })
        .collect()
}

/// One observation in a labeled time series. Labels are opaque display
/// strings (dates, term names); ordering is whatever the caller supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

impl TrendPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        TrendPoint {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub change_percentage: f64,
    pub significance: Significance,
    pub point_count: usize,
    pub period: String,
}

/// Sentinel `period` value for series too short to compare.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";

/// Percentage-change bounds for calling a series up/down vs stable, and for
/// flagging the change as significant.
pub const TREND_DIRECTION_THRESHOLD: f64 = 5.0;
pub const TREND_SIGNIFICANCE_THRESHOLD: f64 = 10.0;

/// First-to-last percentage change over a labeled series, in input order.
/// A zero first value yields a zero change rather than an infinity.
pub fn trend(points: &[TrendPoint]) -> TrendResult {
    if points.len() < 2 {
        return TrendResult {
            direction: TrendDirection::Stable,
            change_percentage: 0.0,
            significance: Significance::Low,
            point_count: points.len(),
            period: INSUFFICIENT_DATA.to_string(),
        };
    }

    let first = &points[0];
    let last = &points[points.len() - 1];
    let change_percentage = if first.value.abs() < f64::EPSILON {
        0.0
    } else {
        (last.value - first.value) / first.value * 100.0
    };

    let direction = if change_percentage > TREND_DIRECTION_THRESHOLD {
        TrendDirection::Up
    } else if change_percentage < -TREND_DIRECTION_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };
    let significance = if change_percentage.abs() > TREND_SIGNIFICANCE_THRESHOLD {
        Significance::High
    } else {
        Significance::Low
    };

    TrendResult {
        direction,
        change_percentage,
        significance,
        point_count: points.len(),
        period: format!("{} - {}", first.label, last.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cohort_is_all_zeros() {
        let s = cohort_statistics(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.median, 0.0);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 0.0);
        assert_eq!(s.standard_deviation, 0.0);
        assert_eq!(s.skewness, 0.0);
    }

    #[test]
    fn single_value_cohort() {
        let s = cohort_statistics(&[75.0]);
        assert_eq!(s.count, 1);
        assert_eq!(s.mean, 75.0);
        assert_eq!(s.median, 75.0);
        assert_eq!(s.min, 75.0);
        assert_eq!(s.max, 75.0);
        assert_eq!(s.standard_deviation, 0.0);
        assert_eq!(s.skewness, 0.0);
    }

    #[test]
    fn ten_score_cohort_fixture() {
        let scores = [85.0, 90.0, 78.0, 92.0, 88.0, 76.0, 95.0, 82.0, 89.0, 91.0];
        let s = cohort_statistics(&scores);
        assert_eq!(s.count, 10);
        assert!((s.mean - 86.6).abs() < 1e-9);
        assert!((s.median - 88.5).abs() < 1e-9);
        assert_eq!(s.min, 76.0);
        assert_eq!(s.max, 95.0);
        // Population formula: variance is 348.4 / 10.
        assert!((s.standard_deviation.powi(2) - 34.84).abs() < 1e-9);
    }

    #[test]
    fn known_population_std_dev() {
        let s = cohort_statistics(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s.mean - 5.0).abs() < 1e-9);
        assert!((s.standard_deviation - 2.0).abs() < 1e-9);
    }

    #[test]
    fn skewness_sign_follows_outlier_tail() {
        // A few very low scores among an otherwise high cohort: left tail.
        let low_outliers = cohort_statistics(&[95.0, 93.0, 94.0, 92.0, 91.0, 40.0, 45.0]);
        assert!(low_outliers.skewness < 0.0);

        // A few very high scores among an otherwise low cohort: right tail.
        let high_outliers = cohort_statistics(&[55.0, 58.0, 56.0, 57.0, 54.0, 98.0, 99.0]);
        assert!(high_outliers.skewness > 0.0);
    }

    #[test]
    fn symmetric_cohort_has_zero_skewness() {
        let s = cohort_statistics(&[60.0, 70.0, 80.0, 90.0, 100.0]);
        assert!(s.skewness.abs() < 1e-9);
    }

    #[test]
    fn uniform_cohort_has_zero_skewness_without_dividing_by_zero() {
        let s = cohort_statistics(&[82.0, 82.0, 82.0]);
        assert_eq!(s.standard_deviation, 0.0);
        assert_eq!(s.skewness, 0.0);
    }

    #[test]
    fn distribution_places_boundaries_in_upper_band() {
        let buckets = distribution(&[90.0, 89.9, 80.0, 60.0, 59.99, 101.0, -5.0]);
        let by_label = |label: &str| {
            buckets
                .iter()
                .find(|b| b.label == label)
                .expect("band present")
                .count
        };
        assert_eq!(by_label("90-100"), 2); // 90.0 and the out-of-range 101.0
        assert_eq!(by_label("80-89"), 2); // 89.9 and 80.0
        assert_eq!(by_label("70-79"), 0);
        assert_eq!(by_label("60-69"), 1);
        assert_eq!(by_label("0-59"), 2); // 59.99 and the stray negative
    }

    #[test]
    fn distribution_counts_sum_to_cohort_size() {
        let values = [95.0, 85.0, 75.0, 65.0, 30.0];
        let buckets = distribution(&values);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), values.len());
        for b in &buckets {
            assert_eq!(b.count, 1);
            assert_eq!(b.percentage, 20);
        }
    }

    #[test]
    fn distribution_rounds_each_band_independently() {
        // Three bands at 1/3 each: 33 + 33 + 33 = 99, preserved as-is.
        let buckets = distribution(&[95.0, 85.0, 75.0]);
        let total: u32 = buckets.iter().map(|b| b.percentage).sum();
        assert_eq!(total, 99);
    }

    #[test]
    fn distribution_of_empty_cohort_is_zeroed() {
        let buckets = distribution(&[]);
        assert_eq!(buckets.len(), 5);
        for b in buckets {
            assert_eq!(b.count, 0);
            assert_eq!(b.percentage, 0);
        }
    }

    #[test]
    fn rising_series_is_up_and_significant() {
        let points: Vec<TrendPoint> = [75.0, 78.0, 82.0, 85.0, 88.0]
            .iter()
            .enumerate()
            .map(|(i, v)| TrendPoint::new((i + 1).to_string(), *v))
            .collect();
        let t = trend(&points);
        assert_eq!(t.direction, TrendDirection::Up);
        assert!((t.change_percentage - 17.333333333333336).abs() < 1e-6);
        assert_eq!(t.significance, Significance::High);
        assert_eq!(t.point_count, 5);
        assert_eq!(t.period, "1 - 5");
    }

    #[test]
    fn single_point_yields_insufficient_data_sentinel() {
        let t = trend(&[TrendPoint::new("1", 75.0)]);
        assert_eq!(t.direction, TrendDirection::Stable);
        assert_eq!(t.change_percentage, 0.0);
        assert_eq!(t.significance, Significance::Low);
        assert_eq!(t.period, INSUFFICIENT_DATA);
    }

    #[test]
    fn small_changes_stay_stable_and_low() {
        let t = trend(&[TrendPoint::new("a", 80.0), TrendPoint::new("b", 83.0)]);
        // +3.75%, inside the ±5 band.
        assert_eq!(t.direction, TrendDirection::Stable);
        assert_eq!(t.significance, Significance::Low);
    }

    #[test]
    fn falling_series_is_down() {
        let t = trend(&[TrendPoint::new("a", 90.0), TrendPoint::new("b", 70.0)]);
        assert_eq!(t.direction, TrendDirection::Down);
        assert_eq!(t.significance, Significance::High);
        assert!((t.change_percentage + 22.22222222222222).abs() < 1e-6);
    }

    #[test]
    fn zero_baseline_does_not_explode() {
        let t = trend(&[TrendPoint::new("a", 0.0), TrendPoint::new("b", 50.0)]);
        assert_eq!(t.change_percentage, 0.0);
        assert_eq!(t.direction, TrendDirection::Stable);
    }

    #[test]
    fn trend_respects_input_order() {
        // Not re-sorted by label: "10" before "2" is the caller's business.
        let t = trend(&[TrendPoint::new("10", 50.0), TrendPoint::new("2", 60.0)]);
        assert_eq!(t.period, "10 - 2");
        assert!(t.change_percentage > 0.0);
    }
}
