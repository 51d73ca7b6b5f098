//! Stroke rendering and color mixing benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gouache_lib::brush::BrushType;
use gouache_lib::color::{mix_oklab, mix_pigments, Rgb};
use gouache_lib::input::InputSample;
use gouache_lib::{EngineConfig, PaintEngine, PaintSettings};

fn generate_stroke(count: usize) -> Vec<InputSample> {
    (0..count)
        .map(|i| {
            let t = i as f32 / count as f32;
            InputSample::new(
                50.0 + t * 900.0,
                (t * std::f32::consts::PI * 4.0).sin() * 100.0 + 500.0,
                0.3 + t * 0.4,
            )
        })
        .collect()
}

fn render(engine: &mut PaintEngine, points: &[InputSample], settings: &PaintSettings) {
    engine.start_stroke(points[0], settings);
    for chunk in points[1..].chunks(8) {
        engine.draw_batch(chunk, settings);
    }
    engine.end_stroke();
}

fn benchmark_stroke_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stroke Rendering");
    group.sample_size(20);

    for count in [10, 50, 100, 500].iter() {
        let points = generate_stroke(*count);
        let settings = PaintSettings {
            size: 30.0,
            ..Default::default()
        };
        let mut engine = PaintEngine::new(1024, 1024, EngineConfig::default());

        group.bench_with_input(BenchmarkId::new("round", count), &points, |b, points| {
            b.iter(|| render(&mut engine, points, &settings))
        });
    }

    group.finish();
}

fn benchmark_brush_types(c: &mut Criterion) {
    let mut group = c.benchmark_group("Brush Type Impact");
    group.sample_size(20);

    let points = generate_stroke(100);
    for brush_type in [BrushType::Round, BrushType::FanSplay, BrushType::Pastel] {
        let settings = PaintSettings {
            brush_type,
            size: 40.0,
            ..Default::default()
        };
        let mut engine = PaintEngine::new(1024, 1024, EngineConfig::default());
        group.bench_function(format!("{:?}", brush_type), |b| {
            b.iter(|| render(&mut engine, &points, &settings))
        });
    }

    // Wet mode re-captures the visible layers every batch
    let wet = PaintSettings {
        size: 40.0,
        wet_mode: true,
        auto_clean: false,
        ..Default::default()
    };
    let mut engine = PaintEngine::new(1024, 1024, EngineConfig::default());
    group.bench_function("wet_round", |b| b.iter(|| render(&mut engine, &points, &wet)));

    group.finish();
}

fn benchmark_color_mixing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Color Mixing");
    let cyan = Rgb::new(0.0, 255.0, 255.0);
    let yellow = Rgb::new(255.0, 255.0, 0.0);

    group.bench_function("pigment", |b| {
        b.iter(|| mix_pigments(black_box(cyan), black_box(yellow), black_box(0.5)))
    });
    group.bench_function("oklab", |b| {
        b.iter(|| mix_oklab(black_box(cyan), black_box(yellow), black_box(0.5)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_stroke_rendering,
    benchmark_brush_types,
    benchmark_color_mixing
);
criterion_main!(benches);
