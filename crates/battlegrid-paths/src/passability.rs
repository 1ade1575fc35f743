//! Static terrain passability merged with the dynamic structure overlay.

use std::collections::HashSet;
use std::sync::Arc;

use battlegrid_core::{Bounds, Locomotion, TerrainQuery, TilePos};

/// Snapshot of tiles occupied by structures.
///
/// The set is shared behind an `Arc`: cloning a snapshot and swapping one in
/// are both O(1). A snapshot is never mutated in place; callers build a new
/// one whenever structures are added or removed.
#[derive(Clone, Debug, Default)]
pub struct BlockedTiles(Arc<HashSet<TilePos>>);

impl BlockedTiles {
    pub fn new(tiles: HashSet<TilePos>) -> Self {
        Self(Arc::new(tiles))
    }

    #[inline]
    pub fn contains(&self, tile: TilePos) -> bool {
        self.0.contains(&tile)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = TilePos> + '_ {
        self.0.iter().copied()
    }

    /// Whether both handles point at the same snapshot.
    pub fn ptr_eq(&self, other: &BlockedTiles) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<HashSet<TilePos>> for BlockedTiles {
    fn from(tiles: HashSet<TilePos>) -> Self {
        Self::new(tiles)
    }
}

impl FromIterator<TilePos> for BlockedTiles {
    fn from_iter<I: IntoIterator<Item = TilePos>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Answers "can this unit stand here" and "what does entering cost".
pub struct PassabilityLayer<T> {
    terrain: T,
    blocked: BlockedTiles,
}

impl<T: TerrainQuery> PassabilityLayer<T> {
    pub fn new(terrain: T) -> Self {
        Self {
            terrain,
            blocked: BlockedTiles::default(),
        }
    }

    /// Whether a unit of class `loco` may occupy `tile`.
    ///
    /// False off the grid, on terrain the class cannot cross and on any tile
    /// in the current blocked-tile snapshot.
    #[inline]
    pub fn is_passable(&self, tile: TilePos, loco: Locomotion) -> bool {
        self.terrain.bounds().contains(tile)
            && self.terrain.statically_passable(tile, loco)
            && !self.blocked.contains(tile)
    }

    /// Terrain cost multiplier of `tile`. Structures do not affect it.
    ///
    /// Off-grid tiles report the default multiplier of 1.0; the search never
    /// asks for them.
    #[inline]
    pub fn cost_multiplier(&self, tile: TilePos) -> f64 {
        self.terrain
            .terrain(tile)
            .map_or(1.0, |k| f64::from(k.cost_multiplier()))
    }

    /// Smallest cost multiplier of any tile on the map, or 1.0 for an empty
    /// map. Scaling a distance by it keeps a heuristic admissible.
    pub fn min_cost_multiplier(&self) -> f64 {
        self.bounds()
            .iter()
            .map(|t| self.cost_multiplier(t))
            .reduce(f64::min)
            .unwrap_or(1.0)
    }

    /// Replace the structure overlay. Affects subsequent queries only.
    pub fn set_blocked_tiles(&mut self, blocked: BlockedTiles) {
        self.blocked = blocked;
    }

    pub fn blocked_tiles(&self) -> &BlockedTiles {
        &self.blocked
    }

    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    pub fn bounds(&self) -> Bounds {
        self.terrain.bounds()
    }

    pub fn tile_size(&self) -> f32 {
        self.terrain.tile_size()
    }
}
