use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use binmask_image::{Image, ImageSize};
use binmask_imgproc::threshold::{binarize, threshold_binary, threshold_otsu};

fn create_test_image(width: usize, height: usize) -> Image<u8, 1> {
    let mut rng = StdRng::seed_from_u64(42);
    let data: Vec<u8> = (0..(width * height)).map(|_| rng.random()).collect();
    let size = ImageSize { width, height };
    Image::new(size, data).unwrap()
}

fn bench_threshold(c: &mut Criterion) {
    let mut group = c.benchmark_group("Threshold");

    // We will test on Full HD only for clear results
    let (w, h) = (1920, 1080);
    let src = create_test_image(w, h);

    group.bench_with_input(
        BenchmarkId::new("binary", format!("{}x{}", w, h)),
        &src,
        |b, src| {
            // Allocate outside to measure only algorithm performance
            let mut dst = Image::from_size_val(src.size(), 0).unwrap();
            b.iter(|| {
                threshold_binary(src, &mut dst, 127, 255).unwrap();
            })
        },
    );

    group.bench_with_input(
        BenchmarkId::new("otsu", format!("{}x{}", w, h)),
        &src,
        |b, src| {
            let mut dst = Image::from_size_val(src.size(), 0).unwrap();
            b.iter(|| {
                threshold_otsu(src, &mut dst, 255).unwrap();
            })
        },
    );

    group.bench_with_input(
        BenchmarkId::new("binarize", format!("{}x{}", w, h)),
        &src,
        |b, src| b.iter(|| std::hint::black_box(binarize(src).unwrap())),
    );

    group.finish();
}

criterion_group!(benches, bench_threshold);
criterion_main!(benches);
