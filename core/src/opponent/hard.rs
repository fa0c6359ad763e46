use hashbrown::HashSet;
use smallvec::SmallVec;

use super::*;

const LOOKAHEAD_DEPTH: u32 = 4;

/// Weight of a child's value relative to its parent's.
const DISCOUNT: f64 = 0.9;

const GEM_VALUE: f64 = 100.0;
const SHIELD_VALUE: f64 = 50.0;
const ADJACENT_GEM: f64 = 50.0;
const ADJACENT_SHIELD: f64 = 25.0;
const ADJACENT_MINE: f64 = -75.0;

#[derive(Clone, Debug)]
struct Node {
    /// Slide that led here; `None` only at the root.
    direction: Option<Direction>,
    /// Value of the slide that led here.
    immediate: f64,
    /// Positional estimate, only set where the lookahead stops.
    estimate: f64,
    children: SmallVec<[usize; 8]>,
}

/// Lookahead tree for one decision, stored as an arena with the root at slot 0.
#[derive(Debug)]
struct DecisionTree<'a> {
    grid: &'a Grid,
    policy: &'a RegionPolicy,
    nodes: Vec<Node>,
}

impl<'a> DecisionTree<'a> {
    fn build(grid: &'a Grid, policy: &'a RegionPolicy, actor: Actor, depth: u32) -> Self {
        let mut tree = Self {
            grid,
            policy,
            nodes: Vec::new(),
        };
        let path = HashSet::new();
        tree.grow(actor.position, actor.shields, &path, depth, None, 0.0);
        tree
    }

    /// Adds the node reached at `position` and everything below it, returning its slot.
    ///
    /// `path` holds the cells rested on since the root. A slide ending on one of them is
    /// skipped, so a node can end up with no children even though it has moves.
    fn grow(
        &mut self,
        position: Coord2,
        shields: u32,
        path: &HashSet<Coord2>,
        depth: u32,
        direction: Option<Direction>,
        immediate: f64,
    ) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(Node {
            direction,
            immediate,
            estimate: 0.0,
            children: SmallVec::new(),
        });

        let moves = if depth == 0 {
            SmallVec::new()
        } else {
            valid_moves(self.grid, position, shields)
        };
        if moves.is_empty() {
            self.nodes[slot].estimate = estimate(self.grid, self.policy, position);
            return slot;
        }

        for (direction, slide) in moves {
            if path.contains(&slide.end) {
                continue;
            }
            let mut branch_path = path.clone();
            branch_path.insert(slide.end);

            let value = GEM_VALUE * f64::from(slide.gems)
                + SHIELD_VALUE * f64::from(slide.shields)
                + f64::from(self.policy.bonus(slide.end));
            let child = self.grow(
                slide.end,
                shields_after(&slide, shields),
                &branch_path,
                depth - 1,
                Some(direction),
                value,
            );
            self.nodes[slot].children.push(child);
        }
        slot
    }

    /// Own value plus the best discounted child total.
    fn total(&self, slot: usize) -> f64 {
        let node = &self.nodes[slot];
        match self.best_child(slot) {
            Some((_, child_total)) => node.immediate + DISCOUNT * child_total,
            None => node.immediate + node.estimate,
        }
    }

    /// Child of `slot` with the highest total, and that total. The first one wins ties.
    fn best_child(&self, slot: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for &child in &self.nodes[slot].children {
            let child_total = self.total(child);
            if best.is_none_or(|(_, best_total)| child_total > best_total) {
                best = Some((child, child_total));
            }
        }
        best
    }

    fn best_direction(&self) -> Option<(Direction, f64)> {
        let (child, total) = self.best_child(0)?;
        Some((self.nodes[child].direction?, total))
    }
}

/// Static value of standing at `position`: what lies right next to it.
fn estimate(grid: &Grid, policy: &RegionPolicy, position: Coord2) -> f64 {
    let around: f64 = grid
        .iter_neighbors(position)
        .map(|pos| match grid[pos] {
            Cell::Gem => ADJACENT_GEM,
            Cell::Shield => ADJACENT_SHIELD,
            Cell::Mine => ADJACENT_MINE,
            _ => 0.0,
        })
        .sum();
    around + f64::from(policy.bonus(position))
}

/// First slide on the best discounted path of the lookahead tree, if the root can move at all.
pub(super) fn search(grid: &Grid, policy: &RegionPolicy, actor: Actor) -> Option<Direction> {
    let tree = DecisionTree::build(grid, policy, actor, LOOKAHEAD_DEPTH);
    let (direction, total) = tree.best_direction()?;
    log::trace!(
        "hard: {} nodes, {direction} leads with {total:.1}",
        tree.nodes.len()
    );
    Some(direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(size: Coord2, cells: &[(Coord2, Cell)]) -> Grid {
        let mut grid = Grid::walled(size);
        for &(coords, cell) in cells {
            grid.set_cell(coords, cell).unwrap();
        }
        grid
    }

    fn run(grid: &Grid, position: Coord2, shields: u32) -> Option<Direction> {
        let policy = RegionPolicy::analyze(grid);
        search(grid, &policy, Actor { position, shields })
    }

    fn root_child(tree: &DecisionTree<'_>, direction: Direction) -> usize {
        tree.nodes[0]
            .children
            .iter()
            .copied()
            .find(|&child| tree.nodes[child].direction == Some(direction))
            .unwrap()
    }

    #[test]
    fn estimate_weighs_neighbouring_items() {
        let grid = grid_with(
            (12, 12),
            &[
                ((4, 4), Cell::Gem),
                ((4, 5), Cell::Gem),
                ((5, 6), Cell::Shield),
                ((6, 6), Cell::Mine),
            ],
        );
        let policy = RegionPolicy::analyze(&grid);

        // two gems, a shield and a mine
        assert_eq!(estimate(&grid, &policy, (5, 5)), 50.0);
        // the wall ring is in bounds but scores nothing
        assert_eq!(estimate(&grid, &policy, (1, 1)), 0.0);
    }

    #[test]
    fn leaf_total_adds_estimate_and_inner_total_discounts_children() {
        let grid = grid_with((12, 12), &[]);
        let policy = RegionPolicy::analyze(&grid);
        let mut tree = DecisionTree {
            grid: &grid,
            policy: &policy,
            nodes: Vec::new(),
        };
        // root -> a (10) -> leaf (20, estimate 5)
        let root = tree.grow((5, 5), 0, &HashSet::new(), 0, None, 0.0);
        let a = tree.grow((5, 5), 0, &HashSet::new(), 0, Some(Direction::N), 10.0);
        let leaf = tree.grow((5, 5), 0, &HashSet::new(), 0, Some(Direction::E), 20.0);
        tree.nodes[leaf].estimate = 5.0;
        tree.nodes[a].children.push(leaf);
        tree.nodes[root].children.push(a);

        assert_eq!(tree.total(leaf), 25.0);
        assert!((tree.total(a) - (10.0 + 0.9 * 25.0)).abs() < 1e-9);
        assert_eq!(
            tree.best_direction().map(|(direction, _)| direction),
            Some(Direction::N)
        );
    }

    #[test]
    fn root_without_moves_has_no_direction() {
        let grid = grid_with(
            (12, 12),
            &[
                ((9, 9), Cell::Mine),
                ((9, 10), Cell::Wall),
                ((10, 9), Cell::Wall),
            ],
        );

        assert_eq!(run(&grid, (10, 10), 0), None);
        assert_eq!(run(&grid, (10, 10), 1), Some(Direction::NW));
    }

    #[test]
    fn position_without_moves_is_scored_by_its_neighbours() {
        let grid = grid_with(
            (12, 12),
            &[
                ((9, 9), Cell::Mine),
                ((9, 10), Cell::Wall),
                ((10, 9), Cell::Wall),
            ],
        );
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (10, 10),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].estimate, ADJACENT_MINE);
        assert_eq!(tree.total(0), ADJACENT_MINE);
    }

    #[test]
    fn boxed_in_child_is_scored_by_its_neighbours() {
        // the actor stands on a mine it survived earlier. N stops after one step against the
        // wall at (3, 5), and from there every slide is blocked or runs back into the mine.
        let grid = grid_with(
            (12, 12),
            &[
                ((5, 5), Cell::Mine),
                ((3, 4), Cell::Wall),
                ((3, 5), Cell::Wall),
                ((3, 6), Cell::Wall),
                ((4, 4), Cell::Wall),
                ((4, 6), Cell::Wall),
                ((5, 4), Cell::Wall),
                ((5, 6), Cell::Wall),
            ],
        );
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (5, 5),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);
        let north = root_child(&tree, Direction::N);

        assert!(tree.nodes[north].children.is_empty());
        assert_eq!(tree.total(north), ADJACENT_MINE);
        // nothing on the board scores above zero, so N would win the tie in compass order
        // if its neighbours were ignored
        let chosen = run(&grid, (5, 5), 0);
        assert!(chosen.is_some());
        assert_ne!(chosen, Some(Direction::N));
    }

    #[test]
    fn takes_the_gem_even_when_it_is_not_the_closest_move() {
        let grid = grid_with((12, 12), &[((1, 7), Cell::Gem), ((1, 8), Cell::Gem)]);

        assert_eq!(run(&grid, (1, 1), 0), Some(Direction::E));
    }

    #[test]
    fn never_picks_an_unshielded_mine() {
        let grid = grid_with((12, 12), &[((2, 2), Cell::Mine), ((6, 6), Cell::Gem)]);

        let direction = run(&grid, (1, 1), 0);

        assert!(direction.is_some());
        assert_ne!(direction, Some(Direction::SE));
    }

    #[test]
    fn every_root_child_is_a_valid_move() {
        let grid = grid_with((12, 12), &[((2, 2), Cell::Mine), ((1, 4), Cell::Wall)]);
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (1, 1),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);
        let root_moves: Vec<_> = tree.nodes[0]
            .children
            .iter()
            .filter_map(|&child| tree.nodes[child].direction)
            .collect();

        assert_eq!(root_moves, [Direction::E, Direction::S]);
    }

    #[test]
    fn revisited_cells_are_skipped() {
        // on a 3x3 interior each corner slides to the other three corners only. Below the
        // root that gives 3, 9, 18 and 18 nodes: a path may return to the root's cell but
        // never to a cell it already rested on.
        let grid = Grid::walled((5, 5));
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (1, 1),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);

        assert_eq!(tree.nodes.len(), 1 + 3 + 9 + 18 + 18);
    }

    #[test]
    fn node_whose_moves_are_all_revisits_keeps_only_its_immediate_value() {
        // a three-cell corridor: E to (1, 3), W back to (1, 1), and E again is a revisit
        let grid = grid_with(
            (5, 5),
            &[
                ((2, 1), Cell::Wall),
                ((2, 2), Cell::Mine),
                ((2, 3), Cell::Wall),
            ],
        );
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (1, 1),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);

        assert_eq!(tree.nodes.len(), 3);
        let back = &tree.nodes[2];
        assert_eq!(back.direction, Some(Direction::W));
        assert!(back.children.is_empty());
        assert_eq!(tree.total(2), back.immediate);
        assert_ne!(estimate(&grid, &policy, (1, 1)), 0.0);
    }

    #[test]
    fn region_bonus_counts_in_slides_and_estimates() {
        // the mine at (1, 1) makes the top-left leaf the worst region
        let grid = grid_with((5, 5), &[((1, 1), Cell::Mine)]);
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (3, 1),
            shields: 1,
        };

        let full = DecisionTree::build(&grid, &policy, actor, LOOKAHEAD_DEPTH);
        let north = root_child(&full, Direction::N);
        assert_eq!(full.nodes[north].immediate, -40.0);
        assert_eq!(estimate(&grid, &policy, (1, 1)), -40.0);

        // one slide deep every total is zero except N, which the bonus counts twice
        let shallow = DecisionTree::build(&grid, &policy, actor, 1);
        let north = root_child(&shallow, Direction::N);
        assert_eq!(shallow.total(north), -80.0);
        assert_eq!(
            shallow.best_direction().map(|(direction, _)| direction),
            Some(Direction::NE)
        );
    }

    #[test]
    fn leaf_estimates_steer_a_shallow_tree() {
        // E ends next to a mine; SE and S end in quiet corners
        let grid = grid_with((12, 12), &[((2, 9), Cell::Mine)]);
        let policy = RegionPolicy::analyze(&grid);
        let actor = Actor {
            position: (1, 1),
            shields: 0,
        };

        let tree = DecisionTree::build(&grid, &policy, actor, 1);

        assert_eq!(
            tree.best_direction().map(|(direction, _)| direction),
            Some(Direction::SE)
        );
    }
}
