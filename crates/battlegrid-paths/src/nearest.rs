//! Nearest passable tile lookup by expanding Chebyshev rings.

use battlegrid_core::{Locomotion, TerrainQuery, TilePos};

use crate::distance::euclidean_sq;
use crate::passability::PassabilityLayer;

impl<T: TerrainQuery> PassabilityLayer<T> {
    /// Find the passable tile closest to `tile` for `loco`.
    ///
    /// Rings of increasing Chebyshev radius are scanned outward, starting
    /// with `tile` itself at radius 0. The first ring holding any passable
    /// tile wins; within that ring the tile nearest to `tile` in Euclidean
    /// distance is returned, ties resolved in row-major order. Returns `None`
    /// once `max_ring_radius` is exceeded without a hit.
    pub fn find_nearest(
        &self,
        tile: TilePos,
        loco: Locomotion,
        max_ring_radius: i32,
    ) -> Option<TilePos> {
        if max_ring_radius < 0 {
            return None;
        }
        if self.is_passable(tile, loco) {
            return Some(tile);
        }

        let bounds = self.bounds();
        if bounds.is_empty() {
            return None;
        }
        // Measured in i64 so that tiles near the ends of the i32 range do
        // not overflow.
        let axis = |p: i32, lo: i32, hi: i32| -> (i64, i64) {
            let (p, lo, hi) = (i64::from(p), i64::from(lo), i64::from(hi) - 1);
            ((lo - p).max(p - hi).max(0), (p - lo).abs().max((p - hi).abs()))
        };
        let (near_x, far_x) = axis(tile.x, bounds.min.x, bounds.max.x);
        let (near_z, far_z) = axis(tile.z, bounds.min.z, bounds.max.z);
        // No ring within the radius touches the map.
        if near_x.max(near_z) > i64::from(max_ring_radius) {
            return None;
        }
        // Past this radius every ring lies wholly outside the map.
        let reach = far_x.max(far_z);
        let limit = i64::from(max_ring_radius).min(reach) as i32;

        for r in 1..=limit {
            let mut best: Option<(i64, TilePos)> = None;
            for dz in -r..=r {
                let edge_row = dz.abs() == r;
                let mut dx = -r;
                while dx <= r {
                    let cand = tile
                        .x
                        .checked_add(dx)
                        .zip(tile.z.checked_add(dz))
                        .map(|(x, z)| TilePos::new(x, z));
                    if let Some(cand) = cand.filter(|&c| self.is_passable(c, loco)) {
                        let d = euclidean_sq(tile, cand);
                        if best.is_none_or(|(bd, _)| d < bd) {
                            best = Some((d, cand));
                        }
                    }
                    // Interior rows of a ring only touch its left and right edges.
                    dx += if edge_row { 1 } else { 2 * r };
                }
            }
            if let Some((_, found)) = best {
                return Some(found);
            }
        }
        None
    }
}
