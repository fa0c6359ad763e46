use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Fixed-size board surface. The outer ring is always wall.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

/// What a single slide did, or would do when simulated.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlideOutcome {
    /// Final cell of the slide. When `hit_mine` is set this is the mine cell.
    pub end: Coord2,
    pub gems: u32,
    pub shields: u32,
    pub hit_mine: bool,
}

impl SlideOutcome {
    const fn stationary(start: Coord2) -> Self {
        Self {
            end: start,
            gems: 0,
            shields: 0,
            hit_mine: false,
        }
    }

    /// Whether the slide from `start` was blocked on its first step.
    pub fn is_noop(&self, start: Coord2) -> bool {
        self.end == start && !self.hit_mine
    }

    /// A mine reached without any shield to absorb it.
    pub const fn is_fatal(&self, shields: u32) -> bool {
        self.hit_mine && shields == 0
    }
}

impl Grid {
    /// An empty grid of `size` surrounded by the wall ring.
    pub fn walled(size: Coord2) -> Self {
        let (rows, cols) = size;
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            if row == 0
                || col == 0
                || row + 1 == usize::from(rows)
                || col + 1 == usize::from(cols)
            {
                Cell::Wall
            } else {
                Cell::Empty
            }
        });
        Self { cells }
    }

    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (rows, cols) = cells.dim();
        if rows > usize::from(Coord::MAX) || cols > usize::from(Coord::MAX) {
            return Err(GameError::InvalidCoords);
        }

        let grid = Self { cells };
        let open_border = grid
            .iter_cells()
            .any(|(coords, cell)| grid.is_border(coords) && !cell.is_wall());
        if open_border {
            return Err(GameError::OpenBorder);
        }
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // from_cells and walled never admit a side longer than Coord::MAX
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn is_border(&self, (row, col): Coord2) -> bool {
        let (rows, cols) = self.size();
        row == 0 || col == 0 || row + 1 == rows || col + 1 == cols
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    /// Places `cell` at an interior position. The wall ring cannot be edited.
    pub fn set_cell(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        if self.is_border(coords) {
            return Err(GameError::OpenBorder);
        }
        self.cells[coords.to_nd_index()] = cell;
        Ok(())
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn count(&self, kind: Cell) -> CellCount {
        self.cells
            .iter()
            .filter(|&&cell| cell == kind)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn gems_left(&self) -> CellCount {
        self.count(Cell::Gem)
    }

    pub fn has_gems(&self) -> bool {
        self.cells.iter().any(|&cell| cell == Cell::Gem)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Walks a slide from `start` without touching the grid, calling `visit` for every cell
    /// entered before the slide ends. A mine that ends the slide is not visited.
    pub fn trace_slide<F>(&self, start: Coord2, direction: Direction, mut visit: F) -> SlideOutcome
    where
        F: FnMut(Coord2, Cell),
    {
        let bounds = self.size();
        let mut outcome = SlideOutcome::stationary(start);
        let mut pos = start;

        while let Some(next) = apply_delta(pos, direction.delta(), bounds) {
            let cell = self[next];
            if cell.is_wall() {
                break;
            }

            pos = next;
            outcome.end = pos;

            if cell == Cell::Mine {
                outcome.hit_mine = true;
                break;
            }

            visit(pos, cell);
            match cell {
                Cell::Gem => outcome.gems += 1,
                Cell::Shield => outcome.shields += 1,
                Cell::Stop => break,
                _ => {}
            }
        }

        outcome
    }

    /// Slide from `start` as a what-if; nothing on the grid changes.
    pub fn simulate_slide(&self, start: Coord2, direction: Direction) -> SlideOutcome {
        self.trace_slide(start, direction, |_, _| {})
    }

    /// Slide from `start`, permanently removing every gem and shield passed over.
    pub fn consume_slide(&mut self, start: Coord2, direction: Direction) -> SlideOutcome {
        let mut picked: SmallVec<[Coord2; 8]> = SmallVec::new();
        let outcome = self.trace_slide(start, direction, |pos, cell| {
            if cell.is_item() {
                picked.push(pos);
            }
        });

        for pos in picked {
            *self.cell_mut(pos) = Cell::Empty;
        }
        outcome
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (row, col): Coord2) -> &Self::Output {
        &self.cells[(row as usize, col as usize)]
    }
}
