//! Benchmarks for walk construction and evolution
//!
//! Run with: cargo bench -p qwalk

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qwalk::graph::{complete_graph, cycle_graph};
use qwalk::{
    Ctqw, CtqwMatrix, HamiltonianStorage, MarkedSet, QwSearch, Szegedy, execute_single,
    walk_operators,
};

/// Benchmark Szegedy reflection construction
fn bench_szegedy_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("szegedy_operators");

    for n in &[8, 16, 32] {
        let model = Szegedy::new(complete_graph(*n)).unwrap();
        group.bench_with_input(BenchmarkId::new("complete", n), n, |b, _| {
            b.iter(|| walk_operators(black_box(model.sqrtstochastic())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark Szegedy search steps
fn bench_szegedy_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("szegedy_steps");

    for n in &[16, 64] {
        let model = Szegedy::new(cycle_graph(*n)).unwrap();
        let search = QwSearch::new(model, MarkedSet::new([0], *n).unwrap(), 0.0).unwrap();
        let initial = search.initial_state();
        group.bench_with_input(BenchmarkId::new("cycle_10_steps", n), n, |b, _| {
            b.iter(|| execute_single(&search, black_box(&initial), 10usize).unwrap());
        });
    }

    group.finish();
}

/// Benchmark CTQW evolution, Krylov vs dense propagator
fn bench_ctqw_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctqw_evolution");

    for n in &[32, 128] {
        for (label, storage) in [
            ("sparse", HamiltonianStorage::Sparse),
            ("dense", HamiltonianStorage::Dense),
        ] {
            let model = Ctqw::new(cycle_graph(*n), CtqwMatrix::Adjacency).with_storage(storage);
            let search = QwSearch::new(model, MarkedSet::new([0], *n).unwrap(), 0.0).unwrap();
            let initial = search.initial_state();
            group.bench_with_input(BenchmarkId::new(label, n), n, |b, _| {
                b.iter(|| execute_single(&search, black_box(&initial), 5.0).unwrap());
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_szegedy_operators,
    bench_szegedy_steps,
    bench_ctqw_evolution,
);
criterion_main!(benches);
