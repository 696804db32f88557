use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::distribution;

/// A fixed-width histogram over small non-negative integers.
///
/// Bucket `i` counts the occurrences of value `i`, so the histogram covers the
/// half-open range `0..len`. Values outside the range are rejected rather than
/// clamped, which keeps the buckets an exact record of what was observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeHistogram {
    /// Per-value counts, indexed by value.
    pub counts: Vec<u64>,
}

impl AgeHistogram {
    /// Creates an empty histogram with `len` buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gvstat_stats::histogram::AgeHistogram;
    /// let histogram = AgeHistogram::new(110);
    /// assert_eq!(histogram.len(), 110);
    /// assert_eq!(histogram.total(), 0);
    /// ```
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            counts: vec![0; len],
        }
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Increments the bucket for `value`.
    ///
    /// Returns `false` and leaves the histogram untouched when `value` has no bucket.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gvstat_stats::histogram::AgeHistogram;
    /// let mut histogram = AgeHistogram::new(110);
    /// assert!(histogram.record(20));
    /// assert!(!histogram.record(150));
    /// assert_eq!(histogram.count(20), 1);
    /// assert_eq!(histogram.total(), 1);
    /// ```
    pub fn record(&mut self, value: u32) -> bool {
        match usize::try_from(value)
            .ok()
            .and_then(|idx| self.counts.get_mut(idx))
        {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Count for `value`, zero when out of range.
    #[must_use]
    pub fn count(&self, value: u32) -> u64 {
        usize::try_from(value)
            .ok()
            .and_then(|idx| self.counts.get(idx))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all buckets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Sum of the buckets in `center - radius ..= center + radius`.
    ///
    /// The window is clipped to the histogram bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// # use gvstat_stats::histogram::AgeHistogram;
    /// let mut histogram = AgeHistogram::new(10);
    /// for value in [3, 4, 4, 5, 9] {
    ///     histogram.record(value);
    /// }
    /// assert_eq!(histogram.window_sum(4, 1), 4);
    /// assert_eq!(histogram.window_sum(9, 1), 1);
    /// ```
    #[must_use]
    pub fn window_sum(&self, center: u32, radius: u32) -> u64 {
        match self.window_range(center, radius) {
            Some(range) => self.counts[range].iter().sum(),
            None => 0,
        }
    }

    fn window_range(&self, center: u32, radius: u32) -> Option<RangeInclusive<usize>> {
        let last = self.counts.len().checked_sub(1)?;
        let start = usize::try_from(center.saturating_sub(radius)).ok()?;
        let end = usize::try_from(center.saturating_add(radius))
            .unwrap_or(usize::MAX)
            .min(last);
        (start <= end).then_some(start..=end)
    }

    /// Normalized distribution of this histogram.
    ///
    /// See [`distribution::normalize`].
    #[must_use]
    pub fn distribution(&self) -> Vec<f64> {
        distribution::normalize(&self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_rejects_out_of_range() {
        let mut histogram = AgeHistogram::new(110);
        assert!(histogram.record(0));
        assert!(histogram.record(109));
        assert!(!histogram.record(110));
        assert!(!histogram.record(u32::MAX));
        assert_eq!(histogram.total(), 2);
        assert_eq!(histogram.count(110), 0);
    }

    #[test]
    fn test_window_sum_clips_to_bounds() {
        let mut histogram = AgeHistogram::new(5);
        for value in 0..5 {
            histogram.record(value);
        }
        assert_eq!(histogram.window_sum(0, 1), 2);
        assert_eq!(histogram.window_sum(2, 1), 3);
        assert_eq!(histogram.window_sum(4, 2), 3);
        assert_eq!(histogram.window_sum(20, 1), 0);
    }

    #[test]
    fn test_empty_histogram() {
        let histogram = AgeHistogram::new(0);
        assert!(histogram.is_empty());
        assert_eq!(histogram.window_sum(0, 1), 0);
        assert!(histogram.distribution().is_empty());
    }
}
