//! **battlegrid-core**: core types for the battlefield tile grid.
//!
//! This crate provides the geometry shared by the battlegrid crates (tile
//! coordinates, rectangular bounds, world-space points) together with the
//! terrain model: terrain categories, locomotion classes and the
//! [`TerrainQuery`] interface through which pathfinding reads a map.

pub mod geom;
pub mod terrain;

pub use geom::{Bounds, BoundsIter, TilePos, WorldPoint};
pub use terrain::{Locomotion, TerrainKind, TerrainMap, TerrainParseError, TerrainQuery};
