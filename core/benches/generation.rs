use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use inertia_core::*;
use rand::{SeedableRng, rngs::StdRng};

const SIZES: [Coord; 3] = [8, 12, 24];

fn gen_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");
    for difficulty in Difficulty::ALL {
        for side in SIZES {
            let config = BoardConfig::new_unchecked((side, side), difficulty);
            group.bench_with_input(
                BenchmarkId::new(difficulty.name(), side),
                &config,
                |b, &config| {
                    let mut rng = StdRng::seed_from_u64(0x1e27);
                    b.iter(|| black_box(Board::generate(config, &mut rng)));
                },
            );
        }
    }
    group.finish();
}

fn prune(c: &mut Criterion) {
    let config = BoardConfig::new_unchecked((24, 24), Difficulty::Medium);
    let mut rng = StdRng::seed_from_u64(7);
    let grid = generate_grid(config, &mut rng);

    c.bench_function("generation/prune_24", |b| {
        b.iter(|| {
            let mut grid = grid.clone();
            black_box(prune_unreachable_gems(&mut grid, HUMAN_START))
        })
    });
}

criterion_group!(benches, gen_tiers, prune);
criterion_main!(benches);
