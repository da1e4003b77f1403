use criterion::{criterion_group, criterion_main, Criterion};

use polybrot::{render, render_single, EscapeFunction, LinearScale, PlaneMapper, RenderConfig};

fn still(c: &mut Criterion) {
    let config = RenderConfig::still();
    let plane = PlaneMapper::new(&polybrot::Viewport::square(120)).unwrap();
    let escape = config.escape(EscapeFunction::default()).unwrap();
    let scale = LinearScale::default();

    c.bench_function("still 120px single", |b| {
        b.iter(|| render_single(&plane, &escape, &scale))
    });
    c.bench_function("still 120px threaded", |b| {
        b.iter(|| render(&plane, &escape, &scale, num_cpus::get()).unwrap())
    });
}

fn animation_frame(c: &mut Criterion) {
    let config = RenderConfig::animation();
    let plane = PlaneMapper::new(&polybrot::Viewport::square(120)).unwrap();
    let escape = config.escape(EscapeFunction::Polynomial(2.5)).unwrap();
    let palette = config.palette();

    c.bench_function("polynomial frame 120px", |b| {
        b.iter(|| render_single(&plane, &escape, &palette))
    });
}

criterion_group!(benches, still, animation_frame);
criterion_main!(benches);
