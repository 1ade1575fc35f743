use std::fmt;

use battlegrid_core::{Bounds, TilePos};

/// A path query that could never be answered because it is malformed.
///
/// "No route exists" is not an error; it is reported as `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A start or goal coordinate lies outside the map.
    OutOfBounds { tile: TilePos, bounds: Bounds },
    /// The terrain has no tiles.
    EmptyGrid,
    /// The terrain reports a tile size that is not a positive finite number.
    InvalidTileSize(f32),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { tile, bounds } => {
                write!(f, "tile {tile} is outside the map {bounds}")
            }
            Self::EmptyGrid => f.write_str("terrain grid has no tiles"),
            Self::InvalidTileSize(s) => write!(f, "invalid tile size {s}"),
        }
    }
}

impl std::error::Error for QueryError {}
