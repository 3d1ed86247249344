//! Criterion benchmarks for the annealing loop.
//!
//! Uses synthetic problems (Sphere function, permutation sorting) to
//! measure pure loop overhead independent of any domain.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, RngCore};
use u_anneal::anneal::{AnnealConfig, Annealer, SampleGrowth};

// ===========================================================================
// Sphere function: minimize sum(x_i^2)
// ===========================================================================

fn sphere(x: &Vec<f64>) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn nudge(x: &Vec<f64>, n_changes: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    let mut next = x.clone();
    for _ in 0..n_changes {
        let i = rng.random_range(0..next.len());
        next[i] += rng.random_range(-0.5..0.5);
    }
    next
}

// ===========================================================================
// Permutation sorting: minimize number of misplaced elements
// ===========================================================================

fn misplaced(perm: &Vec<usize>) -> f64 {
    perm.iter().enumerate().filter(|&(i, &v)| i != v).count() as f64
}

fn swap_pairs(perm: &Vec<usize>, n_changes: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let mut next = perm.clone();
    for _ in 0..n_changes {
        let i = rng.random_range(0..next.len());
        let j = rng.random_range(0..next.len());
        next.swap(i, j);
    }
    next
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_sphere");
    group.sample_size(10);

    for &dim in &[10usize, 50, 100] {
        let config = AnnealConfig::default()
            .with_alpha(0.9)
            .with_epsilon(0.01)
            .with_initial_samples(20.0)
            .with_seed(42);
        let annealer = Annealer::new(sphere, nudge, config)
            .expect("valid config")
            .with_observer(());
        let start = vec![4.0; dim];
        group.bench_with_input(BenchmarkId::from_parameter(dim), &start, |b, s| {
            b.iter(|| black_box(annealer.run(black_box(s.clone()))))
        });
    }
    group.finish();
}

fn bench_permutation(c: &mut Criterion) {
    let mut group = c.benchmark_group("anneal_permutation");
    group.sample_size(10);

    for &n in &[10usize, 50] {
        let config = AnnealConfig::default()
            .with_alpha(0.9)
            .with_epsilon(0.05)
            .with_initial_samples(10.0)
            .with_n_changes(2)
            .with_sample_growth(SampleGrowth::Geometric { factor: 1.05 })
            .with_seed(42);
        let annealer = Annealer::new(misplaced, swap_pairs, config)
            .expect("valid config")
            .with_observer(());
        let start: Vec<usize> = (0..n).rev().collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &start, |b, s| {
            b.iter(|| black_box(annealer.run(black_box(s.clone()))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sphere, bench_permutation);
criterion_main!(benches);
