//! Benchmarks for the C-grid metric stencils.
//!
//! Run with: cargo bench --package cgrid --bench metrics_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nalgebra::DMatrix;

use cgrid::{Axis, Focus, GridMetrics, Polygon};

fn curvilinear(n: usize) -> GridMetrics {
    // gently rotated and sheared so every stencil does real work
    let x = DMatrix::from_fn(n, n, |j, i| i as f64 + 0.1 * j as f64 + 0.01 * (j * i) as f64);
    let y = DMatrix::from_fn(n, n, |j, i| j as f64 - 0.05 * i as f64);
    GridMetrics::new(x, y).unwrap()
}

// =============================================================================
// POINT SETS
// =============================================================================

fn bench_point_sets(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_sets");

    for n in [50usize, 200] {
        let grid = curvilinear(n);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::new("rho", n), &grid, |b, g| {
            b.iter(|| black_box(g.x_rho()))
        });
        group.bench_with_input(BenchmarkId::new("u_v", n), &grid, |b, g| {
            b.iter(|| (black_box(g.x_u()), black_box(g.y_v())))
        });
    }

    group.finish();
}

// =============================================================================
// METRICS
// =============================================================================

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    let grid = curvilinear(200);

    group.bench_function("dx_dy", |b| b.iter(|| (black_box(grid.dx()), black_box(grid.dy()))));
    group.bench_function("dndx_dmde", |b| {
        b.iter(|| (black_box(grid.dndx()), black_box(grid.dmde())))
    });
    group.bench_function("angle", |b| b.iter(|| black_box(grid.angle())));
    group.bench_function("orthogonality", |b| b.iter(|| black_box(grid.orthogonality())));

    group.finish();
}

// =============================================================================
// MASKING
// =============================================================================

fn bench_mask_polygon(c: &mut Criterion) {
    let grid = curvilinear(200);
    let polygon = Polygon::new(vec![
        (20.0, 20.0),
        (150.0, 30.0),
        (170.0, 160.0),
        (90.0, 120.0),
        (30.0, 150.0),
    ])
    .unwrap();

    c.bench_function("mask_polygon_200", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut g| black_box(g.mask_polygon(&polygon, 0.0).unwrap()),
            criterion::BatchSize::LargeInput,
        )
    });
}

// =============================================================================
// FOCUS
// =============================================================================

fn bench_focus(c: &mut Criterion) {
    let focus = Focus::new()
        .with_focus(0.5, Axis::X, 2.0, 0.1)
        .and_then(|f| f.with_focus(0.25, Axis::Y, 0.5, 0.2))
        .unwrap();

    c.bench_function("focus_seed_200", |b| {
        b.iter(|| black_box(focus.seed_grid(200, 200).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_point_sets,
    bench_metrics,
    bench_mask_polygon,
    bench_focus
);
criterion_main!(benches);
