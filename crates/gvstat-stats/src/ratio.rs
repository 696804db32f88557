//! Zero-guarded ratios and sliding-window ratio curves.

use std::ops::Range;

use crate::histogram::AgeHistogram;

/// `numerator / denominator`, or `0.0` when the denominator is zero.
///
/// # Examples
///
/// ```
/// use gvstat_stats::ratio::ratio_or_zero;
///
/// assert_eq!(ratio_or_zero(1, 4), 0.25);
/// assert_eq!(ratio_or_zero(0, 0), 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn ratio_or_zero(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Computes a smoothed ratio curve over a range of ages.
///
/// For each `age` in `ages`, sums both histograms over the window
/// `age - radius ..= age + radius` and returns the ratio of the sums,
/// or `0.0` for a window with an empty denominator.
///
/// Windows are clipped to the histogram bounds. Callers that want every window
/// to be full-width must choose `ages` so that `ages.start >= radius` and
/// `ages.end + radius <= len`.
///
/// # Examples
///
/// ```
/// use gvstat_stats::{histogram::AgeHistogram, ratio::windowed_ratio_curve};
///
/// let mut survived = AgeHistogram::new(40);
/// let mut total = AgeHistogram::new(40);
/// for (age, killed) in [(30, false), (30, true), (31, false)] {
///     total.record(age);
///     if !killed {
///         survived.record(age);
///     }
/// }
/// let curve = windowed_ratio_curve(&survived, &total, 1, 29..33);
/// assert_eq!(curve[1].0, 30);
/// assert!((curve[1].1 - 2.0 / 3.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn windowed_ratio_curve(
    numerators: &AgeHistogram,
    denominators: &AgeHistogram,
    radius: u32,
    ages: Range<u32>,
) -> Vec<(u32, f64)> {
    ages.map(|age| {
        let numerator = numerators.window_sum(age, radius);
        let denominator = denominators.window_sum(age, radius);
        (age, ratio_or_zero(numerator, denominator))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_from(len: usize, values: &[u32]) -> AgeHistogram {
        let mut histogram = AgeHistogram::new(len);
        for &value in values {
            histogram.record(value);
        }
        histogram
    }

    #[test]
    fn test_empty_window_is_zero() {
        let survived = histogram_from(10, &[]);
        let total = histogram_from(10, &[]);
        let curve = windowed_ratio_curve(&survived, &total, 1, 1..9);
        assert_eq!(curve.len(), 8);
        assert!(curve.iter().all(|&(_, rate)| rate == 0.0));
    }

    #[test]
    fn test_window_smooths_neighbours() {
        let survived = histogram_from(10, &[4, 6]);
        let total = histogram_from(10, &[4, 5, 6, 6]);
        let curve = windowed_ratio_curve(&survived, &total, 1, 5..6);
        assert_eq!(curve, vec![(5, 0.5)]);
    }

    #[test]
    fn test_radius_zero_is_pointwise() {
        let survived = histogram_from(10, &[2]);
        let total = histogram_from(10, &[2, 2, 3]);
        let curve = windowed_ratio_curve(&survived, &total, 0, 2..4);
        assert_eq!(curve, vec![(2, 0.5), (3, 0.0)]);
    }
}
