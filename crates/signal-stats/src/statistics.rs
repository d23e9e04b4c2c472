//! Statistical Features Computation

/// Statistical features for a signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticalFeatures {
    /// Number of samples
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl StatisticalFeatures {
    /// Compute statistical features from a slice of values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_computation() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = StatisticalFeatures::compute(&values);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_std_dev_computation() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = StatisticalFeatures::compute(&values);
        // Population std dev is exactly 2.0 for this dataset
        assert!((stats.std_dev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_max() {
        let values = vec![3.0, 7.0, 4.0, 8.0];
        let stats = StatisticalFeatures::compute(&values);
        assert_eq!(stats.min, 3.0);
        assert_eq!(stats.max, 8.0);
        assert_eq!(mean(&values), Some(5.5));
    }

    #[test]
    fn test_empty_values() {
        let values: Vec<f64> = vec![];
        let stats = StatisticalFeatures::compute(&values);
        assert_eq!(stats, StatisticalFeatures::default());
        assert_eq!(mean(&values), None);
    }

    proptest! {
        #[test]
        fn prop_mean_within_bounds(values in proptest::collection::vec(-1.0e3f64..1.0e3, 1..64)) {
            let stats = StatisticalFeatures::compute(&values);
            prop_assert!(stats.mean >= stats.min - 1e-9);
            prop_assert!(stats.mean <= stats.max + 1e-9);
            prop_assert!(stats.std_dev >= 0.0);
        }
    }
}
