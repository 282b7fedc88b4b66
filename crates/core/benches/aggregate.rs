//! Criterion benchmarks for results aggregation.
//!
//! Run with:
//!   cargo bench -p ao_sim
//!
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ao_sim::aggregate::CumulativeRecord;
use ao_sim::environment::EnvironmentKind;
use ao_sim::heatmap::VisitHeatmap;
use ao_sim::results::{SimulationStep, VisitCounts};

fn make_trace(len: usize) -> Vec<SimulationStep> {
    const ACTIONS: [&str; 3] = ["choice_a", "choice_b", "choice_a"];
    (0..len)
        .map(|i| SimulationStep::new(i as u64 + 1, ACTIONS[i % ACTIONS.len()], i % 7 == 0))
        .collect()
}

fn make_visits(side: usize) -> VisitCounts {
    let mut visits = VisitCounts::new();
    for r in 0..side {
        for c in 0..side {
            visits.insert(format!("({r}, {c})"), (r * side + c) as u64);
        }
    }
    visits
}

fn bench_cumulative(c: &mut Criterion) {
    let mut group = c.benchmark_group("cumulative_record");

    for len in [1_000, 10_000, 100_000].iter() {
        let steps = make_trace(*len);
        group.throughput(Throughput::Elements(*len as u64));

        group.bench_with_input(BenchmarkId::new("two_choice", len), &steps, |b, steps| {
            b.iter(|| {
                let record = CumulativeRecord::new(black_box(steps), EnvironmentKind::TwoChoice);
                black_box(record.last())
            });
        });
    }

    group.finish();
}

fn bench_heatmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("visit_heatmap");

    for side in [5, 10, 20].iter() {
        let visits = make_visits(*side);
        group.throughput(Throughput::Elements((*side * *side) as u64));

        group.bench_with_input(BenchmarkId::new("build", side), &visits, |b, visits| {
            b.iter(|| VisitHeatmap::build(Some(black_box(visits)), *side, *side));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cumulative, bench_heatmap);
criterion_main!(benches);
