//! Outlier-resistant price statistics.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Point statistics over a set of comparable prices.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub median: Decimal,
    pub trimmed_mean: Decimal,
    /// Plain arithmetic mean, kept for reporting.
    pub mean: Decimal,
}

/// Robust aggregation of comparable prices.
pub struct RobustPriceAggregator;

impl RobustPriceAggregator {
    /// Median, trimmed mean and mean of `prices`. Empty input yields zeros.
    pub fn aggregate(prices: &[Decimal]) -> PriceSummary {
        if prices.is_empty() {
            return PriceSummary::default();
        }

        let mut sorted = prices.to_vec();
        sorted.sort();

        PriceSummary {
            median: Self::median_sorted(&sorted),
            trimmed_mean: Self::trimmed_mean_sorted(&sorted),
            mean: mean(&sorted),
        }
    }

    pub fn median(prices: &[Decimal]) -> Decimal {
        let mut sorted = prices.to_vec();
        sorted.sort();
        Self::median_sorted(&sorted)
    }

    pub fn trimmed_mean(prices: &[Decimal]) -> Decimal {
        let mut sorted = prices.to_vec();
        sorted.sort();
        Self::trimmed_mean_sorted(&sorted)
    }

    /// Index range kept by the trimmed mean of `n` sorted values.
    ///
    /// Drops the lowest `ceil(n / 10)` values and everything from index
    /// `floor(9n / 10)` on. When that leaves nothing (n < 3) the whole range
    /// is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use estimo_core::valuation::RobustPriceAggregator;
    ///
    /// assert_eq!(RobustPriceAggregator::trim_bounds(5), (1, 4));
    /// assert_eq!(RobustPriceAggregator::trim_bounds(20), (2, 18));
    /// assert_eq!(RobustPriceAggregator::trim_bounds(2), (0, 2));
    /// ```
    pub fn trim_bounds(n: usize) -> (usize, usize) {
        let lower = n.div_ceil(10);
        let upper = n * 9 / 10;
        if lower >= upper {
            (0, n)
        } else {
            (lower, upper)
        }
    }

    fn median_sorted(sorted: &[Decimal]) -> Decimal {
        let n = sorted.len();
        if n == 0 {
            return Decimal::ZERO;
        }
        let mid = n / 2;
        if n % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / dec!(2)
        } else {
            sorted[mid]
        }
    }

    fn trimmed_mean_sorted(sorted: &[Decimal]) -> Decimal {
        let (lower, upper) = Self::trim_bounds(sorted.len());
        mean(&sorted[lower..upper])
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = values.iter().sum();
    sum / Decimal::from(values.len())
}

/// Mean similarity normalized by the best score, rounded to `0..=100`.
///
/// Zero when there are no usable scores.
pub fn average_precision(scores: &[f64]) -> u8 {
    let scores: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if scores.is_empty() || max <= 0.0 {
        return 0;
    }
    let total: f64 = scores.iter().map(|s| (s / max) * 100.0).sum();
    (total / scores.len() as f64).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(RobustPriceAggregator::aggregate(&[]), PriceSummary::default());
    }

    #[test]
    fn test_outlier_scenario() {
        let summary = RobustPriceAggregator::aggregate(&prices(&[
            130000, 100000, 900000, 110000, 120000,
        ]));
        assert_eq!(summary.median, dec!(120000));
        assert_eq!(summary.trimmed_mean, dec!(120000));
        assert_eq!(summary.mean, dec!(272000));
    }

    #[test]
    fn test_even_count_median() {
        assert_eq!(
            RobustPriceAggregator::median(&prices(&[400, 100, 300, 200])),
            dec!(250)
        );
    }

    #[test]
    fn test_tiny_inputs_are_untrimmed() {
        assert_eq!(RobustPriceAggregator::trimmed_mean(&prices(&[500])), dec!(500));
        assert_eq!(
            RobustPriceAggregator::trimmed_mean(&prices(&[100, 300])),
            dec!(200)
        );
        assert_eq!(RobustPriceAggregator::trim_bounds(1), (0, 1));
        assert_eq!(RobustPriceAggregator::trim_bounds(3), (1, 2));
    }

    #[test]
    fn test_twenty_comparables_drop_two_each_side() {
        let mut values: Vec<i64> = (1..=16).map(|i| 100_000 + i * 1000).collect();
        values.extend([1, 2, 9_000_000, 9_500_000]);
        let summary = RobustPriceAggregator::aggregate(&prices(&values));
        assert_eq!(summary.trimmed_mean, dec!(108500));
    }

    #[test]
    fn test_uneven_count_rounds_trim_outward() {
        assert_eq!(RobustPriceAggregator::trim_bounds(15), (2, 13));
        assert_eq!(RobustPriceAggregator::trim_bounds(11), (2, 9));
        assert_eq!(RobustPriceAggregator::trim_bounds(19), (2, 17));

        // Sorted 1..=15: indices 2..13 keep 3..=13.
        let values: Vec<i64> = (1..=15).rev().collect();
        assert_eq!(
            RobustPriceAggregator::trimmed_mean(&prices(&values)),
            dec!(8)
        );
    }

    #[test]
    fn test_average_precision() {
        assert_eq!(average_precision(&[]), 0);
        assert_eq!(average_precision(&[0.9, 0.45]), 75);
        assert_eq!(average_precision(&[0.0, 0.0]), 0);
        assert_eq!(average_precision(&[0.8]), 100);
    }
}
