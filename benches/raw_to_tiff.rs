use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use raw2tiff::image_pipeline::{
    resize, CfaPattern, ConversionConfig, CpuDeveloper, DevelopParams, RawImageData,
    StandardTiffWriter, TiffCompression, TiffWriter,
};
use std::io::Cursor;

fn generate_mock_mosaic(width: usize, height: usize) -> RawImageData {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| (((x + y) * 13) % 4096) as u16))
        .collect();

    RawImageData {
        width,
        height,
        cpp: 1,
        data,
        cfa: Some(CfaPattern::Rggb),
        black_levels: [128; 4],
        white_levels: [4095; 4],
        wb_coeffs: [2.1, 1.0, 1.6, f32::NAN],
        neutral_wb: [1.0; 4],
        cam_to_xyz: [[0.41, 0.36, 0.18], [0.21, 0.72, 0.07], [0.02, 0.12, 0.95]],
        bits_per_sample: 12,
        make: "Bench".to_string(),
        model: "Mosaic".to_string(),
    }
}

fn benchmark_develop_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("develop_by_size");
    let developer = CpuDeveloper::new();
    let params = DevelopParams::default();

    let sizes = vec![
        (100, 100, "100x100"),
        (500, 500, "500x500"),
        (1000, 1000, "1000x1000"),
    ];

    for (width, height, label) in sizes {
        let raw = generate_mock_mosaic(width, height);

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &raw,
            |b, raw| {
                b.iter(|| developer.develop(black_box(raw), &params));
            },
        );
    }

    group.finish();
}

fn benchmark_compression_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_methods");
    let rgb = CpuDeveloper::new()
        .develop(&generate_mock_mosaic(500, 500), &DevelopParams::default())
        .expect("develop mock mosaic");

    let compressions = vec![
        (TiffCompression::None, "none"),
        (TiffCompression::Lzw, "lzw"),
        (TiffCompression::DeflateFast, "deflate_fast"),
        (TiffCompression::DeflateBest, "deflate_best"),
    ];

    for (compression, label) in compressions {
        let config = ConversionConfig::builder()
            .compression(compression)
            .build();

        group.bench_with_input(
            BenchmarkId::from_parameter(label),
            &rgb,
            |b, rgb| {
                b.iter(|| {
                    let mut output = Cursor::new(Vec::new());
                    let _ = StandardTiffWriter.write_rgb_tiff(black_box(rgb), &mut output, &config);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_area_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("area_resize");
    let rgb = CpuDeveloper::new()
        .develop(&generate_mock_mosaic(1000, 1000), &DevelopParams::default())
        .expect("develop mock mosaic");

    for factor in [2u32, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(factor), &factor, |b, &factor| {
            b.iter(|| resize::area_downscale(black_box(&rgb), factor));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_develop_sizes,
    benchmark_compression_methods,
    benchmark_area_resize
);
criterion_main!(benches);
