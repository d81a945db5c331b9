use std::fmt;

use serde::{Deserialize, Serialize};

/// Terrain a map hex can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    #[default]
    Field,
    City,
    Forest,
    Hill,
}

impl Tile {
    /// Palette order.
    pub const ALL: [Self; 4] = [Self::Field, Self::City, Self::Forest, Self::Hill];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::City => "city",
            Self::Forest => "forest",
            Self::Hill => "hill",
        }
    }

    /// Fill color used by both the grid and the palette.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Field => "#88cc00",
            Self::City => "#b3b3b3",
            Self::Forest => "#2e7d32",
            Self::Hill => "#a1887f",
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
