use std::collections::VecDeque;

use ndarray::Array2;

use crate::*;

/// Marks every gem that some chain of slides from `start` passes over.
///
/// The search runs over cells a slide can come to rest on. Every slide tried marks the gems
/// along its path, including slides that end on a mine, but a mine is never used as a
/// resting cell for further expansion.
pub fn reachable_gems(grid: &Grid, start: Coord2) -> Array2<bool> {
    let mut reachable = Array2::from_elem(grid.size().to_nd_index(), false);
    let mut visited = Array2::from_elem(grid.size().to_nd_index(), false);
    let mut to_visit = VecDeque::from([start]);
    visited[start.to_nd_index()] = true;

    while let Some(pos) = to_visit.pop_front() {
        for direction in Direction::ALL {
            let outcome = grid.trace_slide(pos, direction, |passed, cell| {
                if cell == Cell::Gem {
                    reachable[passed.to_nd_index()] = true;
                }
            });

            if outcome.hit_mine {
                continue;
            }

            let seen = &mut visited[outcome.end.to_nd_index()];
            if !*seen {
                *seen = true;
                to_visit.push_back(outcome.end);
            }
        }
    }

    reachable
}

/// Removes gems that no slide from `start` can ever collect, returning how many were removed.
///
/// Removing a gem never changes where a slide ends, so running this twice is the same as
/// running it once.
pub fn prune_unreachable_gems(grid: &mut Grid, start: Coord2) -> CellCount {
    let reachable = reachable_gems(grid, start);

    let unreachable: Vec<Coord2> = grid
        .iter_cells()
        .filter(|&(coords, cell)| cell == Cell::Gem && !reachable[coords.to_nd_index()])
        .map(|(coords, _)| coords)
        .collect();

    for &coords in &unreachable {
        *grid.cell_mut(coords) = Cell::Empty;
    }

    let removed = unreachable.len().try_into().unwrap_or(CellCount::MAX);
    if removed > 0 {
        log::debug!(
            "Pruned {removed} unreachable gems, {} left",
            grid.gems_left()
        );
    }
    removed
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn gem_sealed_by_walls_is_pruned() {
        let mut grid = Grid::walled((7, 7));
        for coords in [(3, 3), (3, 4), (3, 5), (4, 3), (4, 5), (5, 3), (5, 4), (5, 5)] {
            grid.set_cell(coords, Cell::Wall).unwrap();
        }
        grid.set_cell((4, 4), Cell::Gem).unwrap();
        grid.set_cell((1, 3), Cell::Gem).unwrap();

        let removed = prune_unreachable_gems(&mut grid, (1, 1));

        assert_eq!(removed, 1);
        assert_eq!(grid[(4, 4)], Cell::Empty);
        assert_eq!(grid[(1, 3)], Cell::Gem);
    }

    #[test]
    fn gems_passed_over_count_as_reachable() {
        // (1, 3) is never a resting cell, but the east slide from the start crosses it
        let mut grid = Grid::walled((5, 6));
        grid.set_cell((1, 3), Cell::Gem).unwrap();

        let reachable = reachable_gems(&grid, (1, 1));

        assert!(reachable[[1, 3]]);
    }

    #[test]
    fn gems_before_a_mine_are_kept_but_beyond_it_are_not() {
        let mut grid = Grid::walled((3, 8));
        grid.set_cell((1, 2), Cell::Gem).unwrap();
        grid.set_cell((1, 3), Cell::Mine).unwrap();
        grid.set_cell((1, 5), Cell::Gem).unwrap();

        prune_unreachable_gems(&mut grid, (1, 1));

        assert_eq!(grid[(1, 2)], Cell::Gem);
        assert_eq!(grid[(1, 5)], Cell::Empty);
    }

    #[test]
    fn pruning_is_idempotent_on_generated_boards() {
        for seed in 0..16 {
            let config = BoardConfig::new(12, 12, Difficulty::Hard).unwrap();
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut grid = generate_grid(config, &mut rng);
            let once = grid.clone();

            assert_eq!(prune_unreachable_gems(&mut grid, HUMAN_START), 0);
            assert_eq!(grid, once);

            let reachable = reachable_gems(&grid, HUMAN_START);
            for (coords, cell) in grid.iter_cells() {
                if cell == Cell::Gem {
                    assert!(
                        reachable[coords.to_nd_index()],
                        "seed {seed}: gem at {coords:?}"
                    );
                }
            }
        }
    }
}
