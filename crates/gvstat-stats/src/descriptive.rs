use serde::{Deserialize, Serialize};

/// Descriptive statistics summarizing a sample of integer observations.
///
/// This structure contains common measures of central tendency and dispersion
/// for a list of ages (or any other small non-negative integers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The minimum value in the sample.
    pub min: u32,
    /// The maximum value in the sample.
    pub max: u32,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The median of the sample (mean of the two middle values for even counts).
    pub median: f64,
    /// The population standard deviation of the sample.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use gvstat_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([18, 30, 19, 45]).unwrap();
    /// assert_eq!(stats.min, 18);
    /// assert_eq!(stats.max, 45);
    /// assert_eq!(stats.mean, 28.0);
    /// assert_eq!(stats.median, 24.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[u32]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted(),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let sum = sorted_values.iter().map(|&v| u64::from(v)).sum::<u64>();
        let mean = sum as f64 / n;
        let mid = count / 2;
        let median = if count % 2 == 0 {
            f64::midpoint(f64::from(sorted_values[mid - 1]), f64::from(sorted_values[mid]))
        } else {
            f64::from(sorted_values[mid])
        };
        let variance = sorted_values
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
