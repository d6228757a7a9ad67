//! Benchmarks for the label pipeline.
//!
//! Formatting runs once per tick when the label set changes; margin
//! reservation plus layout runs for every label on every resize, which is
//! the path a window drag hammers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use crisp_core::{
    build_atlas, format_number, linear_ticks, AtlasImage, CellMetrics, DeviceSize,
    GlyphRasterizer, LabelEngine, ProjectionRect, RasterGlyph, Result, Tuning,
};

/// Solid 5x9 blocks in a 7x16 cell; enough to drive the layout without a font.
struct BlockRasterizer;

impl GlyphRasterizer for BlockRasterizer {
    fn cell_metrics(&mut self) -> Result<CellMetrics> {
        Ok(CellMetrics {
            width: 7,
            height: 16,
            baseline: 12,
        })
    }

    fn rasterize(&mut self, _character: char) -> Result<RasterGlyph> {
        Ok(RasterGlyph {
            coverage: vec![255; 5 * 9],
            width: 5,
            height: 9,
            left: 1.0,
            top: 9.0,
            advance: 7.0,
        })
    }
}

fn atlas() -> AtlasImage {
    build_atlas(&mut BlockRasterizer).unwrap()
}

/// Surface sizes from a small plot pane up to a full 4K window.
const DEVICES: [(u32, u32); 3] = [(400, 200), (1280, 720), (3840, 2160)];

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_format_number(c: &mut Criterion) {
    let values = [0.0, 4000.0, -12.5, 0.333_333, -1234.5, 123_456_789.0];
    let mut group = c.benchmark_group("format_number");
    for value in values {
        group.bench_with_input(BenchmarkId::from_parameter(value), &value, |b, &value| {
            b.iter(|| format_number(black_box(value)));
        });
    }
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let image = atlas();
    let rect = ProjectionRect::new(0.0, 10000.0, 0.0, 10.0).unwrap();
    let mut engine = LabelEngine::new(&image, rect, Tuning::default());
    engine
        .set_tick_values(
            &linear_ticks(0.0, 10.0, 6),
            &linear_ticks(0.0, 10000.0, 6),
        )
        .unwrap();

    let mut group = c.benchmark_group("engine/resize");
    for &(width, height) in &DEVICES {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &DeviceSize::new(width, height),
            |b, &device| {
                b.iter(|| engine.resize(black_box(device)).unwrap());
            },
        );
    }
    group.finish();
}

/// Replacing the tick set re-formats every label and reruns the reservation.
fn bench_set_tick_values(c: &mut Criterion) {
    let image = atlas();
    let rect = ProjectionRect::new(-500.0, 500.0, -1.0, 1.0).unwrap();
    let mut engine = LabelEngine::new(&image, rect, Tuning::default());
    engine.resize(DeviceSize::new(1280, 720)).unwrap();

    let vertical = linear_ticks(-1.0, 1.0, 11);
    let horizontal = linear_ticks(-500.0, 500.0, 11);
    c.bench_function("engine/set_tick_values", |b| {
        b.iter(|| {
            engine
                .set_tick_values(black_box(&vertical), black_box(&horizontal))
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_format_number, bench_resize, bench_set_tick_values);
criterion_main!(benches);
