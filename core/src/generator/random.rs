use rand::Rng;

use super::*;

/// Percent bands of the per-cell draw, cumulative: walls, gems, stops, mines, shields.
const WALL_BAND: u32 = 12;
const GEM_BAND: u32 = 30;
const STOP_BAND: u32 = 42;
const MINE_BAND: u32 = 48;
const SHIELD_BAND: u32 = 52;

/// Generation strategy driven only by a seed, so the same seed always deals the same board.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: BoardConfig) -> Board {
        use rand::SeedableRng;
        use rand::rngs::SmallRng;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        Board::generate(config, &mut rng)
    }
}

fn in_safety_zone((row, col): Coord2, start: Coord2) -> bool {
    row.abs_diff(start.0) <= 1 && col.abs_diff(start.1) <= 1
}

/// Deals a fresh grid for `config` and prunes every gem the human could never collect.
///
/// Each interior cell outside the two start zones consumes exactly one draw from `rng`, so the
/// result is fully determined by the random stream.
pub fn generate_grid<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Grid {
    let size = config.size();
    let (rows, cols) = size;
    let opponent = opponent_start(size);
    let quota = config.difficulty().shield_quota();

    let mut grid = Grid::walled(size);
    let mut shields_placed = 0;

    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            let coords = (row, col);
            if in_safety_zone(coords, HUMAN_START) || in_safety_zone(coords, opponent) {
                continue;
            }

            let roll = rng.random_range(0..100);
            let cell = if roll < WALL_BAND {
                Cell::Wall
            } else if roll < GEM_BAND {
                Cell::Gem
            } else if roll < STOP_BAND {
                Cell::Stop
            } else if roll < MINE_BAND {
                Cell::Mine
            } else if roll < SHIELD_BAND && shields_placed < quota {
                shields_placed += 1;
                Cell::Shield
            } else {
                Cell::Empty
            };
            *grid.cell_mut(coords) = cell;
        }
    }

    // top up shields anywhere inside, start zones included
    while shields_placed < quota {
        let coords = (
            rng.random_range(1..rows - 1),
            rng.random_range(1..cols - 1),
        );
        let cell = grid.cell_mut(coords);
        if cell.is_empty() {
            *cell = Cell::Shield;
            shields_placed += 1;
        }
    }

    let pruned = prune_unreachable_gems(&mut grid, HUMAN_START);
    log::debug!(
        "Generated {rows}x{cols} {} board: {} gems ({pruned} pruned), {} mines, {shields_placed} shields",
        config.difficulty(),
        grid.gems_left(),
        grid.count(Cell::Mine),
    );
    grid
}
