use brushstroke_core::{curve, random_points, DEFAULT_SEGMENTS, DEFAULT_TENSION};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_curve(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut group = c.benchmark_group("curve");

    for count in [4u32, 32, 256] {
        let points = random_points(count, 1920, 1080, &mut rng);
        group.bench_with_input(BenchmarkId::new("open", count), &points, |b, points| {
            b.iter(|| curve(black_box(points), DEFAULT_TENSION, DEFAULT_SEGMENTS, false))
        });
        group.bench_with_input(BenchmarkId::new("closed", count), &points, |b, points| {
            b.iter(|| curve(black_box(points), DEFAULT_TENSION, DEFAULT_SEGMENTS, true))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_curve);
criterion_main!(benches);
