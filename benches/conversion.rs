use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

use autowebp::codec::{FileCandidate, WebpConverter};

fn create_bench_image(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = image::Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255]);
    }
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn bench_webp_conversion(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let input = create_bench_image(1920, 1080);
    let converter = WebpConverter::new();

    let mut group = c.benchmark_group("webp_conversion");
    group.sample_size(10); // Image ops are slow, reduce sample size

    group.bench_function("convert_1080p_png_q80", |b| {
        b.iter(|| {
            let file = FileCandidate::new("bench.png", "image/png", Bytes::from(input.clone()));
            rt.block_on(converter.convert(black_box(file), black_box(80)))
                .unwrap()
        })
    });

    group.bench_function("convert_1080p_png_q10", |b| {
        b.iter(|| {
            let file = FileCandidate::new("bench.png", "image/png", Bytes::from(input.clone()));
            rt.block_on(converter.convert(black_box(file), black_box(10)))
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_webp_conversion);
criterion_main!(benches);
