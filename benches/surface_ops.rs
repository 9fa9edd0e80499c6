//! Benchmarks for the periodic surface pipeline.

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Point3;
use seam::prelude::*;

/// Solid slab `0.3 < z < 0.7` bounded by two periodic `n x n` sheets.
fn create_periodic_slab(n: usize) -> HalfEdgeMesh {
    let mut vertices = Vec::with_capacity(2 * n * n);
    let mut faces = Vec::with_capacity(4 * n * n);

    for (sheet, z) in [(0, 0.7), (1, 0.3)] {
        let base = sheet * n * n;
        for j in 0..n {
            for i in 0..n {
                vertices.push(Point3::new((i as f64 + 0.5) / n as f64, (j as f64 + 0.5) / n as f64, z));
            }
        }
        let id = |i: usize, j: usize| base + (i % n) + n * (j % n);
        for j in 0..n {
            for i in 0..n {
                let (v00, v10, v11, v01) = (id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1));
                if sheet == 0 {
                    faces.push([v00, v10, v11]);
                    faces.push([v00, v11, v01]);
                } else {
                    faces.push([v00, v11, v10]);
                    faces.push([v00, v01, v11]);
                }
            }
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_surface(c: &mut Criterion) {
    let mesh = create_periodic_slab(64);
    let cell = SimulationCell::unit([true, true, false]);

    c.bench_function("build_surface_mesh_slab_64", |b| {
        b.iter(|| build_surface_mesh(&mesh, &cell).unwrap());
    });

    c.bench_function("build_cap_mesh_slab_64", |b| {
        b.iter(|| build_cap_mesh(&mesh, &cell, false).unwrap());
    });
}

fn bench_smoothing(c: &mut Criterion) {
    let mesh = create_periodic_slab(64);
    let cell = SimulationCell::unit([true, true, false]);

    c.bench_function("smooth_surface_parallel", |b| {
        b.iter(|| {
            let mut m = mesh.clone();
            smooth_surface(&mut m, &cell, &SmoothOptions::default()).unwrap();
            m
        });
    });

    c.bench_function("smooth_surface_sequential", |b| {
        let options = SmoothOptions::default().with_parallel(false);
        b.iter(|| {
            let mut m = mesh.clone();
            smooth_surface(&mut m, &cell, &options).unwrap();
            m
        });
    });
}

criterion_group!(benches, bench_surface, bench_smoothing);
criterion_main!(benches);
