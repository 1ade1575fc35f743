//! Terrain-aware route finding for battlefield tile grids.
//!
//! The crate answers "how does this unit get from here to there" on a map
//! described by a [`TerrainQuery`](battlegrid_core::TerrainQuery):
//!
//! - **Passability** ([`PassabilityLayer`]) merges static terrain rules for
//!   each [`Locomotion`](battlegrid_core::Locomotion) class with a
//!   swappable snapshot of structure-blocked tiles ([`BlockedTiles`]).
//! - **Nearest passable** ([`PassabilityLayer::find_nearest`]) relocates a
//!   blocked start or goal by scanning Chebyshev rings.
//! - **Search** is a budgeted A* with an admissible cost-scaled octile
//!   heuristic and no corner cutting.
//! - **Post-processing** ([`postprocess`]) turns the tile chain into a
//!   simplified polyline of world-space tile centers.
//!
//! [`Pathfinder`] ties these together and is the usual entry point.
//!
//! # Edge cost
//!
//! Moving onto a tile costs the step length (1 orthogonally, √2
//! diagonally) times that tile's multiplier. Among open nodes with equal
//! `f = g + h` the one with the larger `g` is expanded first.

mod config;
mod distance;
mod error;
mod nearest;
mod neighbors;
mod node;
mod passability;
mod pathfinder;
pub mod postprocess;
mod search;

pub use config::PathConfig;
pub use distance::{chebyshev, euclidean_sq, manhattan, octile};
pub use error::QueryError;
pub use neighbors::{DIAGONAL_STEP, Neighbors, ORTHOGONAL_STEP, Step, is_legal_step};
pub use passability::{BlockedTiles, PassabilityLayer};
pub use pathfinder::Pathfinder;
