//! Property-based tests for the Examine procedure

use proptest::prelude::*;
use tabstat_core::{Calculator, Value, VariableDef};
use tabstat_examine::{ExamineCalculator, ExamineRequest};

fn request(data: &[f64], weights: Vec<f64>) -> ExamineRequest {
    ExamineRequest::new(
        VariableDef::numeric("x"),
        data.iter().map(|&x| Value::from(x)).collect(),
    )
    .with_weights(weights)
}

proptest! {
    // Property: every location estimate lies within the range of the data
    #[test]
    fn prop_locations_within_range(
        data in prop::collection::vec(-1e3f64..1e3, 1..40),
        weight_seed in prop::collection::vec(0.5f64..3.0, 40),
    ) {
        let weights = weight_seed[..data.len()].to_vec();
        let result = ExamineCalculator::new().compute(&request(&data, weights)).unwrap();
        let min = result.stats.descriptive.minimum.unwrap();
        let max = result.stats.descriptive.maximum.unwrap();
        let within = |x: f64| x >= min - 1e-9 && x <= max + 1e-9;

        prop_assert!(within(result.stats.trimmed_mean.unwrap()));
        prop_assert!(within(result.stats.median.unwrap()));
        for (name, m) in result.m_estimators.unwrap().iter() {
            let estimate = m.estimate.unwrap();
            prop_assert!(within(estimate), "{}: {}", name, estimate);
        }
        for p in &result.percentiles {
            prop_assert!(within(p.value.unwrap()));
        }
        let ordered: Vec<f64> = result.percentiles.iter().filter_map(|p| p.value).collect();
        prop_assert!(ordered.windows(2).all(|w| w[0] <= w[1] + 1e-9));
    }

    // Property: repeated calls give identical results
    #[test]
    fn prop_idempotent(data in prop::collection::vec(-50f64..50.0, 0..30)) {
        let req = request(&data, vec![1.0; data.len()]);
        let calc = ExamineCalculator::new();
        prop_assert_eq!(calc.compute(&req).unwrap(), calc.compute(&req).unwrap());
    }
}
