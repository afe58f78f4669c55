use criterion::{Criterion, criterion_group, criterion_main};
use nonogram_sat::encoding::{Encoding, PlacementEncoder, RunPositionEncoder, encode_with};
use nonogram_sat::nonogram::feasibility::{FeasibilityCache, LineFeasibility};
use nonogram_sat::nonogram::generator::random_puzzle;
use nonogram_sat::nonogram::overlap;
use nonogram_sat::nonogram::puzzle::Puzzle;
use nonogram_sat::nonogram::solver::{Session, SolverOptions};
use std::hint::black_box;
use std::time::Duration;

fn puzzles(size: usize, count: usize) -> Vec<Puzzle> {
    let mut rng = fastrand::Rng::with_seed(size as u64);
    (0..count)
        .map(|_| random_puzzle(size, size, 0.55, &mut rng).0)
        .collect()
}

fn bench_enumeration(c: &mut Criterion) {
    let mut group = c.benchmark_group("feasibility - enumeration");
    for (hints, length) in [
        (vec![1, 1, 1], 20),
        (vec![2, 3, 1, 2], 25),
        (vec![5, 5], 30),
    ] {
        let line = LineFeasibility::new(&hints, length).unwrap();
        group.bench_function(format!("{hints:?}/{length}"), |b| {
            b.iter(|| black_box(line.iter().count()));
        });
    }
    group.finish();
}

fn bench_overlap(c: &mut Criterion) {
    let puzzles = puzzles(25, 20);
    c.bench_function("overlap - 25x25", |b| {
        b.iter(|| {
            for puzzle in &puzzles {
                let mut puzzle = puzzle.clone();
                black_box(overlap::apply(&mut puzzle).unwrap());
            }
        });
    });
}

fn bench_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoding - 15x15");
    group.sample_size(20);
    let puzzles = puzzles(15, 10);

    group.bench_function("placement", |b| {
        b.iter(|| {
            for puzzle in &puzzles {
                let mut cache = FeasibilityCache::new();
                black_box(encode_with(puzzle, &mut PlacementEncoder::new(&mut cache)).unwrap());
            }
        });
    });
    group.bench_function("run-position", |b| {
        b.iter(|| {
            for puzzle in &puzzles {
                black_box(encode_with(puzzle, &mut RunPositionEncoder).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve - 20x20");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(20));
    let puzzles = puzzles(20, 5);

    for encoding in [Encoding::Placement, Encoding::RunPosition, Encoding::Auto] {
        let options = SolverOptions {
            encoding,
            verify: false,
            ..SolverOptions::default()
        };
        group.bench_function(encoding.to_string(), |b| {
            b.iter(|| {
                let mut session = Session::new(options);
                for puzzle in &puzzles {
                    let mut puzzle = puzzle.clone();
                    black_box(session.solve(&mut puzzle).unwrap());
                }
            });
        });
    }

    let seeded = SolverOptions {
        encoding: Encoding::RunPosition,
        seed_overlap: true,
        verify: false,
        ..SolverOptions::default()
    };
    group.bench_function("run-position + overlap seeding", |b| {
        b.iter(|| {
            let mut session = Session::new(seeded);
            for puzzle in &puzzles {
                let mut puzzle = puzzle.clone();
                black_box(session.solve(&mut puzzle).unwrap());
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_enumeration,
    bench_overlap,
    bench_encoders,
    bench_solve
);
criterion_main!(benches);
