//! Computer opponent.
//!
//! Every decision starts with a [`RegionPolicy`] over the current grid, then runs the search of
//! the requested tier. All tiers work on simulated slides only and never touch the board.
//!
//! - Easy scores each direction by what its slide picks up.
//! - Medium searches up to four slides ahead for the quickest gem.
//! - Hard builds a four-slide lookahead tree and discounts later gains.
//!
//! Medium and Hard fall back to the Easy choice when their search finds nothing, so a direction
//! is always returned.

use smallvec::SmallVec;

use crate::*;

pub use region::*;

mod easy;
mod hard;
mod medium;
mod region;

/// Position and shields of whoever is deciding, as seen by the search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Actor {
    pub position: Coord2,
    pub shields: u32,
}

impl Actor {
    fn of(board: &Board, player: Player) -> Self {
        Self {
            position: board.position(player),
            shields: board.shields(player),
        }
    }
}

/// Shields left after `slide`, given `shields` before it.
pub(crate) fn shields_after(slide: &SlideOutcome, shields: u32) -> u32 {
    let shields = shields + slide.shields;
    if slide.hit_mine && shields > 0 {
        shields - 1
    } else {
        shields
    }
}

/// Directions from `position` that move and are not fatal, with their simulated slides, in
/// compass order.
pub(crate) fn valid_moves(
    grid: &Grid,
    position: Coord2,
    shields: u32,
) -> SmallVec<[(Direction, SlideOutcome); 8]> {
    Direction::ALL
        .into_iter()
        .map(|direction| (direction, grid.simulate_slide(position, direction)))
        .filter(|(_, slide)| !slide.is_fatal(shields) && slide.end != position)
        .collect()
}

/// Direction `player` should slide in next at the given difficulty.
pub fn choose_move(board: &Board, player: Player, difficulty: Difficulty) -> Direction {
    let grid = board.grid();
    let policy = RegionPolicy::analyze(grid);
    let actor = Actor::of(board, player);

    let searched = match difficulty {
        Difficulty::Easy => None,
        Difficulty::Medium => medium::search(grid, &policy, actor),
        Difficulty::Hard => hard::search(grid, &policy, actor),
    };
    let direction = searched.unwrap_or_else(|| {
        if difficulty != Difficulty::Easy {
            log::debug!(
                "{difficulty} search found nothing for {player}, using easy choice"
            );
        }
        easy::choose(grid, &policy, actor)
    });

    log::debug!(
        "{player} ({difficulty}) slides {direction} from {:?}; best region #{} ({:.2}), worst #{} ({:.2})",
        actor.position,
        policy.best().index,
        policy.best().score,
        policy.worst().index,
        policy.worst().score,
    );
    direction
}

/// Direction for the computer opponent.
pub fn choose_opponent_move(board: &Board, difficulty: Difficulty) -> Direction {
    choose_move(board, Player::Opponent, difficulty)
}
