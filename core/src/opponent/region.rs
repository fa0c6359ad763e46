use core::ops::AddAssign;

use crate::*;

/// How many times the board is quartered at most.
const MAX_SPLIT_DEPTH: u32 = 3;

/// Regions this small are tallied directly instead of split further.
const MIN_SPLIT_AREA: u32 = 4;

/// A blocked-in cell has at least this many of its 8 neighbours blocked.
const DEAD_END_BLOCKED: usize = 6;

const BEST_REGION_BONUS: i32 = 30;
const WORST_REGION_PENALTY: i32 = -40;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionCounts {
    pub gems: u32,
    pub shields: u32,
    pub mines: u32,
    pub walls: u32,
    pub dead_ends: u32,
}

impl RegionCounts {
    fn raw_score(&self) -> f64 {
        10.0 * f64::from(self.gems) + 5.0 * f64::from(self.shields)
            - 15.0 * f64::from(self.mines)
            - 8.0 * f64::from(self.dead_ends)
            - 0.5 * f64::from(self.walls)
    }
}

impl AddAssign for RegionCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.gems += rhs.gems;
        self.shields += rhs.shields;
        self.mines += rhs.mines;
        self.walls += rhs.walls;
        self.dead_ends += rhs.dead_ends;
    }
}

/// Rectangle `[row_start, row_end) x [col_start, col_end)` of the board with its tallies.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub row_start: Coord,
    pub row_end: Coord,
    pub col_start: Coord,
    pub col_end: Coord,
    /// Quadtree index: the root is 0 and child `k` in `1..=4` of region `i` is `4 * i + k`.
    pub index: u32,
    pub counts: RegionCounts,
    /// Raw score divided by the square root of the area, so big regions are not favoured.
    pub score: f64,
    children: Option<[usize; 4]>,
}

impl Region {
    fn new(rows: (Coord, Coord), cols: (Coord, Coord), index: u32) -> Self {
        Self {
            row_start: rows.0,
            row_end: rows.1,
            col_start: cols.0,
            col_end: cols.1,
            index,
            counts: RegionCounts::default(),
            score: 0.0,
            children: None,
        }
    }

    pub fn area(&self) -> u32 {
        u32::from(self.row_end - self.row_start) * u32::from(self.col_end - self.col_start)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        (self.row_start..self.row_end).contains(&row)
            && (self.col_start..self.col_end).contains(&col)
    }

    fn rescore(&mut self) {
        let area = self.area();
        let raw = self.counts.raw_score();
        self.score = if area > 0 {
            raw / f64::from(area).sqrt()
        } else {
            raw
        };
    }
}

/// Quadtree of board regions, stored as an arena with the root at slot 0.
#[derive(Clone, Debug)]
pub struct RegionTree {
    regions: Vec<Region>,
}

impl RegionTree {
    pub fn build(grid: &Grid) -> Self {
        let (rows, cols) = grid.size();
        let mut tree = Self {
            regions: Vec::with_capacity(85),
        };
        tree.analyze(grid, Region::new((0, rows), (0, cols), 0), MAX_SPLIT_DEPTH);
        tree
    }

    pub fn root(&self) -> &Region {
        &self.regions[0]
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|region| region.is_leaf())
    }

    /// Splits `region` into quadrants until the depth or area limit, tallying the leaves and
    /// summing the tallies upwards. Returns the arena slot of `region`.
    fn analyze(&mut self, grid: &Grid, mut region: Region, depth: u32) -> usize {
        let slot = self.regions.len();

        if depth == 0 || region.area() <= MIN_SPLIT_AREA {
            region.counts = tally(grid, &region);
            region.rescore();
            self.regions.push(region);
            return slot;
        }

        // reserve the slot so the parent precedes its children
        self.regions.push(region.clone());

        let mid_row = ((u16::from(region.row_start) + u16::from(region.row_end)) / 2) as Coord;
        let mid_col = ((u16::from(region.col_start) + u16::from(region.col_end)) / 2) as Coord;
        let quadrants = [
            ((region.row_start, mid_row), (region.col_start, mid_col)),
            ((region.row_start, mid_row), (mid_col, region.col_end)),
            ((mid_row, region.row_end), (region.col_start, mid_col)),
            ((mid_row, region.row_end), (mid_col, region.col_end)),
        ];

        let mut children = [0; 4];
        let mut counts = RegionCounts::default();
        for (k, (rows, cols)) in quadrants.into_iter().enumerate() {
            let child = Region::new(rows, cols, region.index * 4 + k as u32 + 1);
            children[k] = self.analyze(grid, child, depth - 1);
            counts += self.regions[children[k]].counts;
        }

        region.counts = counts;
        region.children = Some(children);
        region.rescore();
        self.regions[slot] = region;
        slot
    }

    /// Highest (`find_max`) or lowest scoring leaf below `slot`; the first one found wins ties.
    fn extreme_leaf(&self, slot: usize, find_max: bool) -> &Region {
        let region = &self.regions[slot];
        let Some(children) = region.children else {
            return region;
        };

        let mut extreme = self.extreme_leaf(children[0], find_max);
        for &child in &children[1..] {
            let candidate = self.extreme_leaf(child, find_max);
            let better = if find_max {
                candidate.score > extreme.score
            } else {
                candidate.score < extreme.score
            };
            if better {
                extreme = candidate;
            }
        }
        extreme
    }
}

fn tally(grid: &Grid, region: &Region) -> RegionCounts {
    let mut counts = RegionCounts::default();
    for row in region.row_start..region.row_end {
        for col in region.col_start..region.col_end {
            let cell = grid[(row, col)];
            match cell {
                Cell::Wall => counts.walls += 1,
                Cell::Mine => counts.mines += 1,
                Cell::Gem => counts.gems += 1,
                Cell::Shield => counts.shields += 1,
                Cell::Empty | Cell::Stop => {}
            }
            if !cell.is_wall() && is_dead_end(grid, (row, col)) {
                counts.dead_ends += 1;
            }
        }
    }
    counts
}

/// A cell whose neighbourhood is mostly edge, wall or mine.
pub fn is_dead_end(grid: &Grid, coords: Coord2) -> bool {
    let open = grid
        .iter_neighbors(coords)
        .filter(|&pos| !grid[pos].is_obstacle())
        .count();
    Direction::ALL.len() - open >= DEAD_END_BLOCKED
}

/// Which quarter of the board, split at its midpoint, a cell falls in. Numbered 1 to 4
/// from top-left to bottom-right.
pub fn flat_quadrant((rows, cols): Coord2, (row, col): Coord2) -> u32 {
    match (row < rows / 2, col < cols / 2) {
        (true, true) => 1,
        (true, false) => 2,
        (false, true) => 3,
        (false, false) => 4,
    }
}

/// Best and worst leaf regions of one board, used to nudge move scores.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionPolicy {
    size: Coord2,
    best: Region,
    worst: Region,
}

impl RegionPolicy {
    pub fn analyze(grid: &Grid) -> Self {
        let tree = RegionTree::build(grid);
        Self {
            size: grid.size(),
            best: tree.extreme_leaf(0, true).clone(),
            worst: tree.extreme_leaf(0, false).clone(),
        }
    }

    pub fn best(&self) -> &Region {
        &self.best
    }

    pub fn worst(&self) -> &Region {
        &self.worst
    }

    /// Bonus for ending a move at `coords`.
    ///
    /// The cell's flat quadrant number is compared against the quadtree indices of the best and
    /// worst leaves. The two numberings only coincide for leaves one level below the root.
    pub fn bonus(&self, coords: Coord2) -> i32 {
        let quadrant = flat_quadrant(self.size, coords);
        let mut bonus = 0;
        if quadrant == self.best.index {
            bonus += BEST_REGION_BONUS;
        }
        if quadrant == self.worst.index {
            bonus += WORST_REGION_PENALTY;
        }
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_by_twelve_splits_three_levels_deep() {
        let grid = Grid::walled((12, 12));

        let tree = RegionTree::build(&grid);

        assert_eq!(tree.leaves().count(), 64);
        assert!(
            tree.leaves().all(|leaf| leaf.index >= 21 && leaf.index <= 84)
        );
        let leaf_area: u32 = tree.leaves().map(Region::area).sum();
        assert_eq!(leaf_area, 144);
    }

    #[test]
    fn parent_counts_are_sums_of_children() {
        let mut grid = Grid::walled((12, 12));
        grid.set_cell((2, 3), Cell::Gem).unwrap();
        grid.set_cell((8, 8), Cell::Mine).unwrap();
        grid.set_cell((9, 2), Cell::Shield).unwrap();

        let tree = RegionTree::build(&grid);
        let root = tree.root();

        assert_eq!(root.counts.gems, 1);
        assert_eq!(root.counts.mines, 1);
        assert_eq!(root.counts.shields, 1);
        assert_eq!(root.counts.walls, 44);
        let expected = root.counts.raw_score() / 12.0;
        assert!((root.score - expected).abs() < 1e-9);
    }

    #[test]
    fn small_board_stops_at_area_limit() {
        let grid = Grid::walled((4, 4));

        let tree = RegionTree::build(&grid);

        // 16 cells split once into four 2x2 quadrants
        assert_eq!(tree.leaves().count(), 4);
        let indices: Vec<u32> = tree.leaves().map(|leaf| leaf.index).collect();
        assert_eq!(indices, [1, 2, 3, 4]);
    }

    #[test]
    fn best_leaf_holds_the_gem_cluster() {
        let mut grid = Grid::walled((12, 12));
        for coords in [(4, 4), (4, 5), (5, 4)] {
            grid.set_cell(coords, Cell::Gem).unwrap();
        }
        grid.set_cell((7, 7), Cell::Mine).unwrap();

        let policy = RegionPolicy::analyze(&grid);

        assert!(policy.best().contains((4, 4)));
        assert!(policy.best().counts.gems >= 2);
        assert!(policy.worst().score <= policy.best().score);
    }

    #[test]
    fn deep_leaf_indices_never_match_flat_quadrants() {
        let mut grid = Grid::walled((12, 12));
        grid.set_cell((3, 3), Cell::Gem).unwrap();
        let policy = RegionPolicy::analyze(&grid);

        for (coords, _) in grid.iter_cells() {
            assert_eq!(policy.bonus(coords), 0);
        }
    }

    #[test]
    fn shallow_leaves_feed_the_bonus() {
        let grid = Grid::walled((4, 4));
        let policy = RegionPolicy::analyze(&grid);

        // every 2x2 corner holds three walls and one open cell, so all four score the same and
        // the first quadrant is both best and worst
        assert_eq!(policy.best().index, 1);
        assert_eq!(policy.worst().index, 1);
        assert_eq!(
            policy.bonus((0, 0)),
            BEST_REGION_BONUS + WORST_REGION_PENALTY
        );
        assert_eq!(policy.bonus((3, 3)), 0);
    }

    #[test]
    fn dead_end_counts_edges_walls_and_mines() {
        let mut grid = Grid::walled((6, 6));
        // (1, 1) has 5 border neighbours already
        assert!(!is_dead_end(&grid, (1, 1)));
        grid.set_cell((2, 2), Cell::Mine).unwrap();
        assert!(is_dead_end(&grid, (1, 1)));
        assert!(!is_dead_end(&grid, (3, 3)));
    }

    #[test]
    fn flat_quadrants_split_at_board_midpoint() {
        assert_eq!(flat_quadrant((12, 12), (5, 5)), 1);
        assert_eq!(flat_quadrant((12, 12), (5, 6)), 2);
        assert_eq!(flat_quadrant((12, 12), (6, 0)), 3);
        assert_eq!(flat_quadrant((12, 12), (11, 11)), 4);
    }
}
