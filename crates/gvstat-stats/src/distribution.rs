//! Normalization of count vectors into probability-like distributions.

/// Divides every count by the total so that the result sums to 1.
///
/// When the total is zero the result is all zeros, so the output never
/// contains NaN or infinity.
///
/// # Examples
///
/// ```
/// use gvstat_stats::distribution::normalize;
///
/// assert_eq!(normalize(&[1, 3, 0]), vec![0.25, 0.75, 0.0]);
/// assert_eq!(normalize(&[0, 0]), vec![0.0, 0.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn normalize(counts: &[u64]) -> Vec<f64> {
    let total = counts.iter().sum::<u64>();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    let total = total as f64;
    counts.iter().map(|&count| count as f64 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sums_to_one() {
        let counts = [3, 0, 7, 1, 1, 0, 22, 5];
        let dist = normalize(&counts);
        let sum = dist.iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-12, "sum was {sum}");
        assert!(dist.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_all_zero_stays_finite() {
        let dist = normalize(&[0; 110]);
        assert_eq!(dist.len(), 110);
        assert!(dist.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(&[]).is_empty());
    }
}
