// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eikonal_fmm::grid::delinearize;
use eikonal_fmm::seed::{seeds_from_level_set, SeedSet};
use eikonal_fmm::{signed_distance, unsigned_distance};

fn circle_seeds_2d(n: usize) -> SeedSet<2> {
    let center = (n - 1) as f64 / 2.0;
    let radius = n as f64 / 4.0;
    let mut field = vec![0.0f64; n * n];
    for (k, value) in field.iter_mut().enumerate() {
        let index = delinearize(k, [n, n]);
        let x = index[0] as f64 - center;
        let y = index[1] as f64 - center;
        *value = (x * x + y * y).sqrt() - radius;
    }
    seeds_from_level_set([n, n], [1.0, 1.0], &field).unwrap()
}

fn sphere_seeds_3d(n: usize) -> SeedSet<3> {
    let center = (n - 1) as f64 / 2.0;
    let radius = n as f64 / 4.0;
    let mut field = vec![0.0f64; n * n * n];
    for (k, value) in field.iter_mut().enumerate() {
        let index = delinearize(k, [n, n, n]);
        let x = index[0] as f64 - center;
        let y = index[1] as f64 - center;
        let z = index[2] as f64 - center;
        *value = (x * x + y * y + z * z).sqrt() - radius;
    }
    seeds_from_level_set([n, n, n], [1.0, 1.0, 1.0], &field).unwrap()
}

/// Signed vs unsigned on a fixed 256^2 circle.
fn bench_signed_vs_unsigned_2d(c: &mut Criterion) {
    let n = 256;
    let mut group = c.benchmark_group("256x256_circle");
    group.bench_function("signed", |b| {
        b.iter_with_setup(
            || circle_seeds_2d(n),
            |seeds| {
                let result = signed_distance(
                    [n, n],
                    [1.0, 1.0],
                    1.0,
                    &seeds.indices,
                    &seeds.distances,
                    &seeds.normals,
                )
                .unwrap();
                black_box(result)
            },
        );
    });
    group.bench_function("unsigned", |b| {
        b.iter_with_setup(
            || circle_seeds_2d(n),
            |seeds| {
                let result = unsigned_distance(
                    [n, n],
                    [1.0, 1.0],
                    1.0,
                    &seeds.indices,
                    &seeds.distances,
                    &seeds.normals,
                )
                .unwrap();
                black_box(result)
            },
        );
    });
    group.finish();
}

/// Grid size scaling: 2-D circles at increasing resolution.
fn bench_grid_size_scaling_2d(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_size_scaling");
    for &n in &[64, 128, 256, 512] {
        group.bench_function(format!("{}x{}", n, n), |b| {
            b.iter_with_setup(
                || circle_seeds_2d(n),
                |seeds| {
                    let result = signed_distance(
                        [n, n],
                        [1.0, 1.0],
                        1.0,
                        &seeds.indices,
                        &seeds.distances,
                        &seeds.normals,
                    )
                    .unwrap();
                    black_box(result)
                },
            );
        });
    }
    group.finish();
}

/// 3-D sphere at 64^3.
fn bench_sphere_3d(c: &mut Criterion) {
    let n = 64;
    c.bench_function("3d_64x64x64_sphere", |b| {
        b.iter_with_setup(
            || sphere_seeds_3d(n),
            |seeds| {
                let result = signed_distance(
                    [n, n, n],
                    [1.0, 1.0, 1.0],
                    1.0,
                    &seeds.indices,
                    &seeds.distances,
                    &seeds.normals,
                )
                .unwrap();
                black_box(result)
            },
        );
    });
}

criterion_group!(
    benches,
    bench_signed_vs_unsigned_2d,
    bench_grid_size_scaling_2d,
    bench_sphere_3d,
);
criterion_main!(benches);
