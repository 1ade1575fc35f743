//! Geometry primitives: [`TilePos`], [`Bounds`] and [`WorldPoint`].
//!
//! Tiles are addressed on the ground plane by `(x, z)`. `x` grows east and
//! `z` grows south, matching the world axes used by movement code.

use std::fmt;
use std::ops::{Add, Mul, Sub};

// ---------------------------------------------------------------------------
// TilePos
// ---------------------------------------------------------------------------

/// Integer coordinate of a single grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub x: i32,
    pub z: i32,
}

impl TilePos {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, z: 0 };

    /// Create a new tile coordinate.
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Return a tile shifted by (dx, dz).
    #[inline]
    pub const fn shift(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            z: self.z + dz,
        }
    }

    /// The four orthogonal neighbours (north, east, south, west).
    #[inline]
    pub fn neighbors_4(self) -> [TilePos; 4] {
        [
            self.shift(0, -1),
            self.shift(1, 0),
            self.shift(0, 1),
            self.shift(-1, 0),
        ]
    }

    /// All eight neighbours, clockwise from north.
    #[inline]
    pub fn neighbors_8(self) -> [TilePos; 8] {
        [
            self.shift(0, -1),
            self.shift(1, -1),
            self.shift(1, 0),
            self.shift(1, 1),
            self.shift(0, 1),
            self.shift(-1, 1),
            self.shift(-1, 0),
            self.shift(-1, -1),
        ]
    }

    /// Whether `other` is one of the eight tiles surrounding `self`.
    #[inline]
    pub fn is_adjacent(self, other: TilePos) -> bool {
        self != other && (self.x - other.x).abs() <= 1 && (self.z - other.z).abs() <= 1
    }
}

impl PartialOrd for TilePos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TilePos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z.cmp(&other.z).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

impl Add for TilePos {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for TilePos {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<i32> for TilePos {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

impl From<(i32, i32)> for TilePos {
    fn from((x, z): (i32, i32)) -> Self {
        Self::new(x, z)
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// A half-open rectangle of tiles \[min, max).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min: TilePos,
    pub max: TilePos,
}

impl Bounds {
    /// Create bounds from two corners, canonicalized so that `min` ≤ `max`.
    #[inline]
    pub fn new(x0: i32, z0: i32, x1: i32, z1: i32) -> Self {
        Self {
            min: TilePos::new(x0.min(x1), z0.min(z1)),
            max: TilePos::new(x0.max(x1), z0.max(z1)),
        }
    }

    /// Bounds of a `width` × `height` grid anchored at the origin.
    #[inline]
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.z - self.min.z
    }

    /// Total number of tiles.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.width() as usize) * (self.height() as usize)
    }

    /// Whether the bounds cover no tile at all.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.z >= self.max.z
    }

    /// Whether `p` lies inside the half-open rectangle.
    #[inline]
    pub fn contains(self, p: TilePos) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.z >= self.min.z && p.z < self.max.z
    }

    /// Row-major flat index of `p`, or `None` when outside.
    #[inline]
    pub fn index_of(self, p: TilePos) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let x = (p.x - self.min.x) as usize;
        let z = (p.z - self.min.z) as usize;
        Some(z * self.width() as usize + x)
    }

    /// Inverse of [`index_of`](Self::index_of).
    #[inline]
    pub fn tile_at(self, idx: usize) -> TilePos {
        let w = self.width().max(1) as usize;
        TilePos::new(
            (idx % w) as i32 + self.min.x,
            (idx / w) as i32 + self.min.z,
        )
    }

    /// Row-major iterator over every tile.
    #[inline]
    pub fn iter(self) -> BoundsIter {
        BoundsIter {
            bounds: self,
            cur: self.min,
        }
    }
}

impl IntoIterator for Bounds {
    type Item = TilePos;
    type IntoIter = BoundsIter;
    #[inline]
    fn into_iter(self) -> BoundsIter {
        self.iter()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{})", self.min, self.max)
    }
}

/// Row-major iterator over the tiles in a [`Bounds`].
#[derive(Clone, Debug)]
pub struct BoundsIter {
    bounds: Bounds,
    cur: TilePos,
}

impl Iterator for BoundsIter {
    type Item = TilePos;

    #[inline]
    fn next(&mut self) -> Option<TilePos> {
        if self.cur.z >= self.bounds.max.z || self.bounds.is_empty() {
            return None;
        }
        let p = self.cur;
        self.cur.x += 1;
        if self.cur.x >= self.bounds.max.x {
            self.cur.x = self.bounds.min.x;
            self.cur.z += 1;
        }
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.bounds.is_empty() || self.cur.z >= self.bounds.max.z {
            return (0, Some(0));
        }
        let w = self.bounds.width() as usize;
        let remaining_in_row = (self.bounds.max.x - self.cur.x) as usize;
        let remaining_rows = (self.bounds.max.z - self.cur.z - 1) as usize;
        let total = remaining_in_row + remaining_rows * w;
        (total, Some(total))
    }
}

impl ExactSizeIterator for BoundsIter {}

// ---------------------------------------------------------------------------
// WorldPoint
// ---------------------------------------------------------------------------

/// A point on the continuous ground plane, in world units.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub z: f32,
}

impl WorldPoint {
    #[inline]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// World-space center of `tile`: `index * tile_size + tile_size / 2` on
    /// both axes.
    #[inline]
    pub fn tile_center(tile: TilePos, tile_size: f32) -> Self {
        Self {
            x: tile.x as f32 * tile_size + tile_size / 2.0,
            z: tile.z as f32 * tile_size + tile_size / 2.0,
        }
    }

    /// Tile containing this point: `floor(world / tile_size)` on both axes.
    ///
    /// On tile centers this agrees with `floor((world - tile_size / 2) /
    /// tile_size)`, so `tile_center(t, s).to_tile(s) == t`.
    #[inline]
    pub fn to_tile(self, tile_size: f32) -> TilePos {
        TilePos::new(
            (self.x / tile_size).floor() as i32,
            (self.z / tile_size).floor() as i32,
        )
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.z)
    }
}
