//! Property-based tests for weighted moments

use proptest::prelude::*;
use tabstat_core::{Calculator, Value, VariableDef};
use tabstat_descriptive::{DescriptiveCalculator, DescriptiveRequest, WeightedMoments};

fn request(data: &[f64]) -> DescriptiveRequest {
    DescriptiveRequest::new(
        VariableDef::numeric("x"),
        data.iter().map(|&x| Value::from(x)).collect(),
    )
}

proptest! {
    // Property: with uniform weights the mean is the arithmetic mean
    #[test]
    fn prop_uniform_weights_give_arithmetic_mean(data in prop::collection::vec(-1e4f64..1e4, 1..100)) {
        let result = DescriptiveCalculator::new().compute(&request(&data)).unwrap();
        let expected = data.iter().sum::<f64>() / data.len() as f64;
        prop_assert!((result.stats.mean.unwrap() - expected).abs() < 1e-9 * (1.0 + expected.abs()));
        prop_assert_eq!(result.stats.n, data.len() as f64);
    }

    // Property: integer weights behave like replicated cases
    #[test]
    fn prop_integer_weights_match_replication(
        data in prop::collection::vec((-100f64..100.0, 1u8..4), 1..30),
    ) {
        let values: Vec<f64> = data.iter().map(|(x, _)| *x).collect();
        let weights: Vec<f64> = data.iter().map(|(_, w)| f64::from(*w)).collect();
        let expanded: Vec<f64> = data
            .iter()
            .flat_map(|(x, w)| std::iter::repeat(*x).take(*w as usize))
            .collect();
        let weighted = WeightedMoments::compute(&values, &weights).unwrap();
        let replicated = WeightedMoments::unweighted(&expanded).unwrap();

        let close = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (Some(a), Some(b)) => (a - b).abs() < 1e-6 * (1.0 + b.abs()),
            (None, None) => true,
            _ => false,
        };
        prop_assert!(close(Some(weighted.mean), Some(replicated.mean)));
        prop_assert!(close(weighted.variance(), replicated.variance()));
        if replicated.variance().is_some_and(|v| v > 1e-3) {
            prop_assert!(close(weighted.skewness(), replicated.skewness()));
            prop_assert!(close(weighted.kurtosis(), replicated.kurtosis()));
        }
    }

    // Property: undefined statistics are None, never NaN or infinite
    #[test]
    fn prop_no_nan_leaks(data in prop::collection::vec(prop_oneof![Just(5.0f64), -10f64..10.0], 0..6)) {
        let s = DescriptiveCalculator::new().compute(&request(&data)).unwrap().stats;
        for v in [s.mean, s.variance, s.std_dev, s.std_error_mean, s.skewness, s.kurtosis,
                  s.skewness_std_error, s.kurtosis_std_error].into_iter().flatten() {
            prop_assert!(v.is_finite());
        }
    }
}
