use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// One of the eight compass directions a piece can slide in.
///
/// Deltas are `(row, col)`: north decreases the row, east increases the column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// Every direction in compass order, which is also the tie-break order of the opponent.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            N => (-1, 0),
            NE => (-1, 1),
            E => (0, 1),
            SE => (1, 1),
            S => (1, 0),
            SW => (1, -1),
            W => (0, -1),
            NW => (-1, -1),
        }
    }

    pub fn from_delta(delta: (i8, i8)) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.delta() == delta)
    }

    /// Direction of a click at `target` as seen from a piece at `source`.
    ///
    /// Only the signs of the row and column offsets matter, so any cell strictly inside one of
    /// the eight octants maps to that octant's direction. Clicking the source itself yields `None`.
    pub fn from_click(source: Coord2, target: Coord2) -> Option<Self> {
        let d_row = (i16::from(target.0) - i16::from(source.0)).signum();
        let d_col = (i16::from(target.1) - i16::from(source.1)).signum();
        if d_row == 0 && d_col == 0 {
            return None;
        }
        Self::from_delta((d_row as i8, d_col as i8))
    }

    pub const fn name(self) -> &'static str {
        use Direction::*;
        match self {
            N => "N",
            NE => "NE",
            E => "E",
            SE => "SE",
            S => "S",
            SW => "SW",
            W => "W",
            NW => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        use Direction::*;
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" | "up" => Ok(N),
            "ne" | "northeast" => Ok(NE),
            "e" | "east" | "right" => Ok(E),
            "se" | "southeast" => Ok(SE),
            "s" | "south" | "down" => Ok(S),
            "sw" | "southwest" => Ok(SW),
            "w" | "west" | "left" => Ok(W),
            "nw" | "northwest" => Ok(NW),
            _ => Err(GameError::UnknownDirection),
        }
    }
}
