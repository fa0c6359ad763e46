use serde::{Deserialize, Serialize};

/// Contents of a single grid cell. A cell holds at most one thing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Gem,
    Mine,
    Shield,
    /// Ends any slide that enters it.
    Stop,
}

impl Cell {
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall)
    }

    /// Items are consumed by the first slide that passes over them.
    pub const fn is_item(self) -> bool {
        matches!(self, Self::Gem | Self::Shield)
    }

    /// Walls and mines both count as obstacles when judging how open a cell is.
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Wall | Self::Mine)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}
