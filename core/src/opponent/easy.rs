use super::*;

const GEM_VALUE: i32 = 100;
const SHIELD_VALUE: i32 = 50;
const FATAL_SCORE: i32 = -1000;
const NOOP_SCORE: i32 = -500;

/// Score of sliding `direction` right now, looking no further than the slide itself.
pub(super) fn score_direction(
    grid: &Grid,
    policy: &RegionPolicy,
    actor: Actor,
    direction: Direction,
) -> i32 {
    let slide = grid.simulate_slide(actor.position, direction);

    if slide.is_fatal(actor.shields) {
        return FATAL_SCORE;
    }
    if slide.end == actor.position {
        return NOOP_SCORE;
    }

    GEM_VALUE * slide.gems as i32 + SHIELD_VALUE * slide.shields as i32 + policy.bonus(slide.end)
}

/// Highest scoring direction; the earliest in compass order wins ties.
pub(super) fn choose(grid: &Grid, policy: &RegionPolicy, actor: Actor) -> Direction {
    let mut best = (Direction::ALL[0], i32::MIN);
    for direction in Direction::ALL {
        let score = score_direction(grid, policy, actor, direction);
        log::trace!("easy: {direction} scores {score}");
        if score > best.1 {
            best = (direction, score);
        }
    }
    best.0
}
