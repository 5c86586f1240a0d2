use criterion::{black_box, criterion_group, criterion_main, Criterion};

use codeshot::rendering::layout::estimate_width;
use codeshot::{
    build_gradient_css, build_preview, ExportConfig, RasterOptions, Rasterizer, SettingsStore,
    SoftwareRasterizer,
};

fn bench_estimate_width(c: &mut Criterion) {
    let code = include_str!("../src/export.rs");
    c.bench_function("estimate_width", |b| {
        b.iter(|| estimate_width(black_box(code), 600, 1000, 40))
    });
}

fn bench_build_gradient(c: &mut Criterion) {
    c.bench_function("build_gradient_css", |b| {
        b.iter(|| build_gradient_css(black_box("ocean"), black_box(135), ""))
    });
}

fn bench_rasterize_default_preview(c: &mut Criterion) {
    let store = SettingsStore::new();
    let config = ExportConfig::default();
    let preview = build_preview(store.display(), store.background(), &config);
    let raster = SoftwareRasterizer::new();
    let opts = RasterOptions { scale: 1, transparent_background: true };

    c.bench_function("rasterize_default_preview", |b| {
        b.iter(|| raster.rasterize(black_box(&preview), &opts).unwrap())
    });
}

criterion_group!(
    benches,
    bench_estimate_width,
    bench_build_gradient,
    bench_rasterize_default_preview
);
criterion_main!(benches);
