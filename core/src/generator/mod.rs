use crate::*;
pub use random::*;

mod random;

/// Where the human always starts.
pub const HUMAN_START: Coord2 = (1, 1);

/// Where the opponent always starts: the interior corner opposite the human.
pub const fn opponent_start((rows, cols): Coord2) -> Coord2 {
    (rows - 2, cols - 2)
}

pub trait BoardGenerator {
    fn generate(self, config: BoardConfig) -> Board;
}
