//! inertia-core: board physics and computer opponent for a two-player sliding gem game.
//!
//! Pieces slide in one of eight compass directions until a wall, stop marker, or mine halts
//! them, collecting the gems and shields they pass over. [`Board`] owns the game state and
//! rules; [`choose_opponent_move`] picks the computer's direction without touching the board.
//!
//! ```
//! use inertia_core::*;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let config = BoardConfig::new(12, 12, Difficulty::Medium).unwrap();
//! let mut board = Board::generate(config, &mut StdRng::seed_from_u64(42));
//!
//! board.make_move(Player::Human, Direction::E).unwrap();
//! board.check_end_game();
//! if !board.is_finished() {
//!     let reply = choose_opponent_move(&board, config.difficulty());
//!     board.make_move(Player::Opponent, reply).unwrap();
//!     board.check_end_game();
//! }
//! ```

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

pub use analysis::*;
pub use cell::*;
pub use direction::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use opponent::*;
pub use types::*;

mod analysis;
mod cell;
mod direction;
mod engine;
mod error;
mod generator;
mod grid;
mod opponent;
mod types;

/// Smallest side that still fits both start zones inside the wall ring.
pub const MIN_BOARD_SIDE: Coord = 5;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// How many shields generation puts on the board.
    pub const fn shield_quota(self) -> u32 {
        match self {
            Self::Hard => 4,
            Self::Easy | Self::Medium => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    size: Coord2,
    difficulty: Difficulty,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord2, difficulty: Difficulty) -> Self {
        Self { size, difficulty }
    }

    pub fn new(rows: Coord, cols: Coord, difficulty: Difficulty) -> Result<Self> {
        if rows < MIN_BOARD_SIDE || cols < MIN_BOARD_SIDE {
            return Err(GameError::BoardTooSmall { rows, cols });
        }
        Ok(Self::new_unchecked((rows, cols), difficulty))
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Result of a single [`Board::make_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The first step was blocked; nothing changed and the turn is not used up.
    NoChange,
    Moved,
    /// A shield absorbed the mine at `at` and the mover now stands on it.
    ShieldBroken { at: Coord2 },
    /// The mover hit a mine without a shield and lost.
    HitMine,
}

impl MoveOutcome {
    pub const fn has_update(self) -> bool {
        use MoveOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            ShieldBroken { .. } => true,
            HitMine => true,
        }
    }
}
