use core::cmp::Ordering;

use hashbrown::HashSet;

use super::*;

/// Slides searched ahead, counting the one that picks up the gem.
const MAX_DEPTH: u32 = 4;

/// A gem pickup found somewhere down the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Candidate {
    /// First slide on the way to the pickup.
    first: Direction,
    /// Gems collected by the pickup slide.
    value: u32,
    /// Slides needed, pickup included.
    depth: u32,
    bonus: i32,
}

impl Candidate {
    /// More gems first, then fewer slides, then the better region.
    fn rank(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(other.depth.cmp(&self.depth))
            .then(self.bonus.cmp(&other.bonus))
    }
}

/// Resting cell and the shields held before the slide that reached it.
type SearchState = (Coord2, u32);

/// Depth-first search over slide paths. Each path carries its own set of visited states.
struct PathSearch<'a> {
    grid: &'a Grid,
    policy: &'a RegionPolicy,
    /// Calls to `search_from`, the root included.
    explored: u32,
}

impl<'a> PathSearch<'a> {
    fn new(grid: &'a Grid, policy: &'a RegionPolicy) -> Self {
        Self {
            grid,
            policy,
            explored: 0,
        }
    }

    fn search_from(
        &mut self,
        position: Coord2,
        shields: u32,
        path: &HashSet<SearchState>,
        depth: u32,
    ) -> Option<Candidate> {
        self.explored += 1;
        if depth >= MAX_DEPTH {
            return None;
        }

        let mut best: Option<Candidate> = None;
        for (direction, slide) in valid_moves(self.grid, position, shields) {
            let candidate = if slide.gems > 0 {
                Some(Candidate {
                    first: direction,
                    value: slide.gems,
                    depth: 1,
                    bonus: self.policy.bonus(slide.end),
                })
            } else {
                let state = (slide.end, shields);
                if path.contains(&state) {
                    continue;
                }
                let mut branch_path = path.clone();
                branch_path.insert(state);

                self.search_from(
                    slide.end,
                    shields_after(&slide, shields),
                    &branch_path,
                    depth + 1,
                )
                .map(|deeper| Candidate {
                    first: direction,
                    depth: deeper.depth + 1,
                    ..deeper
                })
            };

            if let Some(candidate) = candidate {
                if best.is_none_or(|best| candidate.rank(&best).is_gt()) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

/// First slide towards the best gem pickup within [`MAX_DEPTH`] slides, if there is one.
pub(super) fn search(grid: &Grid, policy: &RegionPolicy, actor: Actor) -> Option<Direction> {
    let mut search = PathSearch::new(grid, policy);
    let found = search.search_from(actor.position, actor.shields, &HashSet::new(), 0);
    log::trace!("medium: explored {} states", search.explored);

    let found = found?;
    log::trace!(
        "medium: {} gem(s) in {} slide(s) via {}",
        found.value,
        found.depth,
        found.first
    );
    Some(found.first)
}
