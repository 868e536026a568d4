//! Property-based tests for frequency table invariants

use proptest::prelude::*;
use tabstat_core::{Calculator, MissingSpec, Value, VariableDef};
use tabstat_frequency::{FrequencyCalculator, FrequencyRequest};

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (0i64..6).prop_map(Value::from),
        1 => Just(Value::Null),
        1 => Just(Value::from(-9.0)),
    ]
}

proptest! {
    // Property: frequencies add up to the valid weight and valid percents to 100
    #[test]
    fn prop_frequencies_sum_to_valid(
        data in prop::collection::vec(cell(), 1..60),
        weight_seed in prop::collection::vec(0.1f64..3.0, 60),
    ) {
        let var = VariableDef::numeric("x").with_missing(MissingSpec::discrete([-9.0]));
        let weights = weight_seed[..data.len()].to_vec();
        let request = FrequencyRequest::new(var, data).with_weights(weights);
        let result = FrequencyCalculator::new().compute(&request).unwrap();
        let table = result.frequency_table.unwrap();

        let total_frequency: f64 = table.rows.iter().map(|r| r.frequency).sum();
        prop_assert!((total_frequency - table.summary.valid).abs() < 1e-9);
        prop_assert!((table.summary.valid + table.summary.missing - table.summary.total).abs() < 1e-9);

        if table.summary.valid > 0.0 {
            let valid_percent: f64 = table.rows.iter().map(|r| r.valid_percent).sum();
            prop_assert!((valid_percent - 100.0).abs() < 1e-6);
            let last = table.rows.last().unwrap();
            prop_assert!((last.cumulative_percent - 100.0).abs() < 1e-6);
        }

        for pair in table.rows.windows(2) {
            prop_assert!(pair[0].value.to_number() < pair[1].value.to_number());
        }
    }

    // Property: identical requests give identical results
    #[test]
    fn prop_idempotent(data in prop::collection::vec(cell(), 0..40)) {
        let request = FrequencyRequest::new(VariableDef::numeric("x"), data);
        let calc = FrequencyCalculator::new();
        let first = calc.compute(&request).unwrap();
        let second = calc.compute(&request).unwrap();
        prop_assert_eq!(first, second);
    }
}
