use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vatti_clip::{ClipType, Clipper, FillRule, IntPoint, Path, PolyKind};

/// Star polygon with `points` spikes, centred on (cx, cy).
fn star(cx: i64, cy: i64, outer: f64, inner: f64, points: usize) -> Path {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f64 * std::f64::consts::PI / points as f64;
            IntPoint::new(cx + (r * a.cos()) as i64, cy + (r * a.sin()) as i64)
        })
        .collect()
}

/// A grid of small squares, offset so neighbouring squares overlap.
fn square_grid(n: i64, size: i64, step: i64) -> Vec<Path> {
    (0..n)
        .flat_map(|row| {
            (0..n).map(move |col| {
                let (x, y) = (col * step, row * step);
                vec![
                    IntPoint::new(x, y),
                    IntPoint::new(x + size, y),
                    IntPoint::new(x + size, y + size),
                    IntPoint::new(x, y + size),
                ]
            })
        })
        .collect()
}

fn run(op: ClipType, subject: &[Path], clip: &[Path]) -> usize {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyKind::Subject, true).unwrap();
    c.add_paths(clip, PolyKind::Clip, true).unwrap();
    c.execute(op, FillRule::NonZero).unwrap().len()
}

fn benchmark_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_stars");

    let subject = vec![star(0, 0, 10_000.0, 4_000.0, 64)];
    let clip = vec![star(2_500, 1_500, 9_000.0, 3_000.0, 48)];

    for (name, op) in [
        ("intersection", ClipType::Intersection),
        ("union", ClipType::Union),
        ("difference", ClipType::Difference),
        ("xor", ClipType::Xor),
    ] {
        group.bench_with_input(BenchmarkId::new("op", name), &op, |b, &op| {
            b.iter(|| run(black_box(op), &subject, &clip));
        });
    }

    group.finish();
}

fn benchmark_many_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("square_grid");

    for n in [10, 30] {
        let subject = square_grid(n, 15, 10);
        let clip = vec![star(n * 5, n * 5, n as f64 * 6.0, n as f64 * 2.0, 16)];
        group.bench_with_input(BenchmarkId::new("union", n * n), &subject, |b, subject| {
            b.iter(|| run(ClipType::Union, black_box(subject), &[]));
        });
        group.bench_with_input(BenchmarkId::new("intersection", n * n), &subject, |b, subject| {
            b.iter(|| run(ClipType::Intersection, black_box(subject), &clip));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_operations, benchmark_many_paths);
criterion_main!(benches);
