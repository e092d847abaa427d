use bodygraph::aspects::{AspectCalculator, AspectSettings};
use bodygraph::ephemeris::{Planet, PlanetSet, PlanetaryPosition, MAIN_PLANETS};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_calculate_aspect(c: &mut Criterion) {
    let calculator = AspectCalculator::new();
    let sun = PlanetaryPosition::at(Planet::Sun, 100.0);
    let moon = PlanetaryPosition::at(Planet::Moon, 221.5);

    c.bench_function("calculate_aspect", |b| {
        b.iter(|| calculator.calculate_aspect(black_box(&sun), black_box(&moon)))
    });
}

fn bench_compute(c: &mut Criterion) {
    let mut positions = PlanetSet::new();
    for (i, planet) in MAIN_PLANETS.iter().enumerate() {
        positions = positions.with(*planet, i as f64 * 30.0 + 1.5);
    }
    let majors = AspectCalculator::with_settings(AspectSettings {
        include_minor: false,
        ..Default::default()
    });

    c.bench_function("compute_all", |b| {
        b.iter(|| AspectCalculator::new().compute(black_box(&positions)))
    });
    c.bench_function("compute_majors", |b| b.iter(|| majors.compute(black_box(&positions))));
}

criterion_group!(benches, bench_calculate_aspect, bench_compute);
criterion_main!(benches);
