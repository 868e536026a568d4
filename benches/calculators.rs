//! Benchmarks for the four calculators over synthetic weighted data

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabstat::prelude::*;

/// Deterministic data with a handful of missing codes and blanks
fn generate_values(size: usize) -> Vec<Value> {
    (0..size)
        .map(|i| match i % 50 {
            0 => Value::Null,
            1 => Value::from(-9.0),
            _ => Value::from(((i as f64 * 0.37).sin() * 40.0).round() + 50.0),
        })
        .collect()
}

fn generate_weights(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 + (i as f64 * 0.01).cos().abs())
        .collect()
}

fn variable() -> VariableDef {
    VariableDef::numeric("score").with_missing(MissingSpec::discrete([-9.0]))
}

fn bench_single_variable(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_variable");

    for &size in &[1_000usize, 10_000, 100_000] {
        let data = generate_values(size);
        let weights = generate_weights(size);

        let descriptive = DescriptiveRequest::new(variable(), data.clone()).with_weights(weights.clone());
        group.bench_with_input(BenchmarkId::new("descriptive", size), &descriptive, |b, req| {
            let calc = DescriptiveCalculator::new();
            b.iter(|| black_box(calc.compute(req)))
        });

        let frequency = FrequencyRequest::new(variable(), data.clone())
            .with_weights(weights.clone())
            .with_options(FrequencyOptions::default().with_quartiles());
        group.bench_with_input(BenchmarkId::new("frequency", size), &frequency, |b, req| {
            let calc = FrequencyCalculator::new();
            b.iter(|| black_box(calc.compute(req)))
        });

        let examine = ExamineRequest::new(variable(), data).with_weights(weights);
        group.bench_with_input(BenchmarkId::new("examine", size), &examine, |b, req| {
            let calc = ExamineCalculator::new();
            b.iter(|| black_box(calc.compute(req)))
        });
    }

    group.finish();
}

fn bench_crosstabs(c: &mut Criterion) {
    let mut group = c.benchmark_group("crosstabs");

    for &size in &[1_000usize, 10_000, 100_000] {
        let data: Vec<CaseRecord> = (0..size)
            .map(|i| CaseRecord::new((i % 7) as f64, ((i * 13) % 5) as f64))
            .collect();
        let weights = generate_weights(size);

        for policy in [NonIntegerWeights::NoAdjustment, NonIntegerWeights::RoundCell] {
            let request = CrosstabsRequest::new(
                VariableDef::numeric("row"),
                VariableDef::numeric("col"),
                data.clone(),
            )
            .with_weights(weights.clone())
            .with_options(
                CrosstabsOptions::default()
                    .with_cells(CellOptions::all())
                    .with_non_integer_weights(policy),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{policy:?}"), size),
                &request,
                |b, req| {
                    let calc = CrosstabsCalculator::new();
                    b.iter(|| black_box(calc.compute(req)))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_single_variable, bench_crosstabs);
criterion_main!(benches);
