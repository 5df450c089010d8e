use criterion::{Criterion, criterion_group, criterion_main};
use image::RgbImage;
use plasma_core::{Canvas, DisplacementModel, PixelBuffer, PlasmaFractal, to_rgb_bytes};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 384;
const SEED: u64 = 2025;

fn canvas() -> Canvas {
    Canvas::new(WIDTH, HEIGHT).expect("bench canvas is non-zero")
}

fn bench_plasma_sequential(c: &mut Criterion) {
    c.bench_function("Plasma sequential into PixelBuffer", |b| {
        let canvas = canvas();
        b.iter(|| {
            let mut buf = PixelBuffer::new(canvas);
            PlasmaFractal::new(canvas, SEED).generate(&mut buf);
            buf
        })
    });
}

fn bench_plasma_parallel(c: &mut Criterion) {
    c.bench_function("Plasma parallel quadrants into PixelBuffer", |b| {
        let canvas = canvas();
        b.iter(|| {
            let mut buf = PixelBuffer::new(canvas);
            PlasmaFractal::new(canvas, SEED).generate_parallel(&mut buf);
            buf
        })
    });
}

fn bench_plasma_attenuated_image(c: &mut Criterion) {
    c.bench_function("Plasma attenuated straight into RgbImage", |b| {
        let canvas = canvas();
        b.iter(|| {
            let mut img = RgbImage::new(WIDTH, HEIGHT);
            PlasmaFractal::new(canvas, SEED)
                .with_displacement(DisplacementModel::attenuated())
                .generate(&mut img);
            img
        })
    });
}

fn bench_plasma_to_bytes(c: &mut Criterion) {
    c.bench_function("Plasma + RGB8 byte conversion", |b| {
        let canvas = canvas();
        b.iter(|| {
            let mut buf = PixelBuffer::new(canvas);
            PlasmaFractal::new(canvas, SEED).generate(&mut buf);
            to_rgb_bytes(&buf)
        })
    });
}

criterion_group!(
    plasma_benchmarks,
    bench_plasma_sequential,
    bench_plasma_parallel,
    bench_plasma_attenuated_image,
    bench_plasma_to_bytes
);
criterion_main!(plasma_benchmarks);
