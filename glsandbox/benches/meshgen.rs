use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glsandbox::isosurface::{Polygonizer, Surface};
use glsandbox::sphere;

fn polygonize(c: &mut Criterion) {
    let poly = Polygonizer {
        resolution: 32,
        ..Default::default()
    };

    c.bench_function("polygonize nordstrand 32", |b| {
        b.iter(|| poly.polygonize(black_box(Surface::Nordstrand)))
    });
}

fn spheres(c: &mut Criterion) {
    c.bench_function("patched sphere 32", |b| {
        b.iter(|| sphere::patched(black_box(32)))
    });

    c.bench_function("lat long sphere", |b| {
        b.iter(|| sphere::lat_long(black_box(2.0), std::f32::consts::PI / 64.0))
    });
}

criterion_group!(benches, polygonize, spheres);
criterion_main!(benches);
