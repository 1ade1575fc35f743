//! Turning raw tile chains into world-space waypoint polylines.
//!
//! A tile maps to its center, `index * tile_size + tile_size / 2` on both
//! axes; see [`WorldPoint::tile_center`]. Callers converting waypoints back
//! to tiles must use [`WorldPoint::to_tile`], i.e. `floor(world /
//! tile_size)`, which agrees with `floor((world - tile_size / 2) /
//! tile_size)` on centers.

use battlegrid_core::{TilePos, WorldPoint};

/// Cross product of `(b - a)` and `(c - b)`.
#[inline]
fn turn(a: TilePos, b: TilePos, c: TilePos) -> i64 {
    let ab = b - a;
    let bc = c - b;
    i64::from(ab.x) * i64::from(bc.z) - i64::from(ab.z) * i64::from(bc.x)
}

/// Drop every point that lies exactly on the line between its kept
/// predecessor and its successor.
///
/// Only direction changes survive, plus the first and last point. The
/// route described is unchanged.
pub fn simplify(tiles: &[TilePos]) -> Vec<TilePos> {
    let Some((&last, _)) = tiles.split_last() else {
        return Vec::new();
    };
    let mut out = Vec::with_capacity(tiles.len());
    out.push(tiles[0]);
    for w in tiles.windows(2).skip(1) {
        let (b, c) = (w[0], w[1]);
        let a = out[out.len() - 1];
        if turn(a, b, c) != 0 {
            out.push(b);
        }
    }
    if tiles.len() > 1 {
        out.push(last);
    }
    out
}

/// Map tiles to their world-space centers.
pub fn to_world(tiles: &[TilePos], tile_size: f32) -> Vec<WorldPoint> {
    tiles
        .iter()
        .map(|&t| WorldPoint::tile_center(t, tile_size))
        .collect()
}

/// Inverse of [`simplify`] for polylines made of straight or 45° segments:
/// every tile crossed along the way, endpoints included.
pub fn expand_polyline(points: &[TilePos]) -> Vec<TilePos> {
    let mut out = Vec::with_capacity(points.len());
    let Some(&first) = points.first() else {
        return out;
    };
    out.push(first);
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let d = TilePos::new((b.x - a.x).signum(), (b.z - a.z).signum());
        let mut c = a;
        while c != b {
            // Straighten out once one axis is done, for segments that are
            // not exactly 45°.
            let step = TilePos::new(
                if c.x == b.x { 0 } else { d.x },
                if c.z == b.z { 0 } else { d.z },
            );
            c = c + step;
            out.push(c);
        }
    }
    out
}
