// Weather FX frame benchmarks
//
// Cost of one simulation step and one paint per condition. Painting goes
// through the recording surface to keep rasterization out of the numbers,
// plus one run through the pixel surface for the full native path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use weather_fx::{Condition, FxEngine, PixelSurface, RecordingSurface, Viewport};

const CONDITIONS: &[Condition] = &[
    Condition::Rain,
    Condition::Thunder,
    Condition::Snow,
    Condition::Clouds,
    Condition::Fog,
];

fn engine(condition: Condition, viewport: Viewport) -> FxEngine {
    let mut engine = FxEngine::with_seed(viewport, 42);
    engine.set_condition(condition);
    engine
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for &condition in CONDITIONS {
        let mut engine = engine(condition, Viewport::new(1920.0, 1080.0, 1.0));
        group.bench_with_input(
            BenchmarkId::from_parameter(condition),
            &condition,
            |b, _| b.iter(|| engine.advance(black_box(16.0))),
        );
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_commands");
    for &condition in CONDITIONS {
        let engine = engine(condition, Viewport::new(1920.0, 1080.0, 1.0));
        let mut surface = RecordingSurface::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(condition),
            &condition,
            |b, _| {
                b.iter(|| {
                    surface.reset();
                    engine.render(black_box(&mut surface));
                })
            },
        );
    }
    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let viewport = Viewport::new(640.0, 360.0, 1.0);
    let mut engine = engine(Condition::Rain, viewport);
    let mut surface = PixelSurface::new(&viewport);
    let mut timestamp = 0.0;

    c.bench_function("rasterize_rain_640x360", |b| {
        b.iter(|| {
            timestamp += 16.0;
            engine.frame(black_box(timestamp), &mut surface)
        })
    });
}

criterion_group!(benches, bench_advance, bench_render, bench_rasterize);
criterion_main!(benches);
