use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board of {rows}x{cols} is too small, both sides need at least 5 cells")]
    BoardTooSmall { rows: Coord, cols: Coord },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid border must be a closed ring of walls")]
    OpenBorder,
    #[error("Players cannot stand on a wall")]
    WallPosition,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Unknown difficulty, expected easy, medium or hard")]
    UnknownDifficulty,
    #[error("Unknown direction, expected one of n, ne, e, se, s, sw, w, nw")]
    UnknownDirection,
}

pub type Result<T> = core::result::Result<T, GameError>;
