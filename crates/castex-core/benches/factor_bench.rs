//! Benchmarks the factorization engine on the concrete scenarios from
//! spec.md §8, from a linear common-factor pull-out up through a cubic that
//! exercises the quadratic and grouping strategies.

use castex_core::{analyze, parse, AnalysisTask, AnalyzeOptions};
use criterion::{criterion_group, criterion_main, Criterion};

const SCENARIOS: &[(&str, &str)] = &[
    ("quadratic_two_linear_factors", "x^2 + 3x + 2"),
    ("difference_of_fourth_powers", "x^4 - 16"),
    ("difference_of_cubes", "x^3 - 1"),
    ("common_factor_linear", "6x + 9"),
    ("cubic_three_linear_factors", "x^3 - 6x^2 + 11x - 6"),
];

fn factor_scenarios(c: &mut Criterion) {
    for (name, source) in SCENARIOS {
        let ast = parse(source).expect("benchmark input parses");
        let options = AnalyzeOptions { task: Some(AnalysisTask::Factor), ..Default::default() };
        c.bench_function(name, |b| {
            b.iter(|| analyze(&ast, &options));
        });
    }
}

criterion_group!(benches, factor_scenarios);
criterion_main!(benches);
