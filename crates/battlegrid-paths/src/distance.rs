use std::f64::consts::SQRT_2;

use battlegrid_core::TilePos;

/// Manhattan (L1) distance between two tiles.
#[inline]
pub fn manhattan(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs() + (a.z - b.z).abs()
}

/// Chebyshev (L∞) distance between two tiles. This is the ring index used by
/// nearest-passable searches.
#[inline]
pub fn chebyshev(a: TilePos, b: TilePos) -> i32 {
    (a.x - b.x).abs().max((a.z - b.z).abs())
}

/// Octile distance: orthogonal steps cost 1, diagonal steps cost √2.
#[inline]
pub fn octile(a: TilePos, b: TilePos) -> f64 {
    let dx = (a.x - b.x).abs();
    let dz = (a.z - b.z).abs();
    let (lo, hi) = if dx < dz { (dx, dz) } else { (dz, dx) };
    f64::from(hi - lo) + f64::from(lo) * SQRT_2
}

/// Squared Euclidean distance between two tile centers.
#[inline]
pub fn euclidean_sq(a: TilePos, b: TilePos) -> i64 {
    let dx = i64::from(a.x - b.x);
    let dz = i64::from(a.z - b.z);
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = TilePos::new(0, 0);
        let b = TilePos::new(3, -4);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(chebyshev(a, b), 4);
        assert_eq!(euclidean_sq(a, b), 25);
        assert!((octile(a, b) - (1.0 + 3.0 * SQRT_2)).abs() < 1e-12);
        assert_eq!(octile(a, a), 0.0);
        assert_eq!(octile(a, TilePos::new(5, 0)), 5.0);
    }
}
