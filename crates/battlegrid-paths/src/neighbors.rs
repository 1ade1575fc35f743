use std::f64::consts::SQRT_2;

use battlegrid_core::TilePos;

/// Length of an orthogonal step.
pub const ORTHOGONAL_STEP: f64 = 1.0;
/// Length of a diagonal step.
pub const DIAGONAL_STEP: f64 = SQRT_2;

const ORTHOGONAL: [TilePos; 4] = [
    TilePos::new(0, -1),
    TilePos::new(1, 0),
    TilePos::new(0, 1),
    TilePos::new(-1, 0),
];

const DIAGONAL: [TilePos; 4] = [
    TilePos::new(1, -1),
    TilePos::new(1, 1),
    TilePos::new(-1, 1),
    TilePos::new(-1, -1),
];

/// A legal single move to an adjacent tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Step {
    pub to: TilePos,
    /// Geometric length of the move, before any terrain multiplier.
    pub len: f64,
}

/// Whether moving from `from` to the adjacent tile `to` is allowed.
///
/// The destination must be passable. A diagonal move additionally needs at
/// least one of the two tiles orthogonally adjacent to both endpoints to be
/// passable, so a unit never slips through the shared corner of two blocked
/// tiles.
pub fn is_legal_step(from: TilePos, to: TilePos, passable: impl Fn(TilePos) -> bool) -> bool {
    if !from.is_adjacent(to) || !passable(to) {
        return false;
    }
    let d = to - from;
    if d.x != 0 && d.z != 0 {
        return passable(from.shift(d.x, 0)) || passable(from.shift(0, d.z));
    }
    true
}

/// Cached neighbor enumeration helper.
///
/// Yields the legal moves out of a tile: up to four orthogonal ones and,
/// when diagonals are enabled, up to four diagonal ones that pass the
/// corner rule of [`is_legal_step`].
pub struct Neighbors {
    buf: Vec<Step>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(8),
        }
    }

    /// Legal moves out of `p`.
    pub fn steps(
        &mut self,
        p: TilePos,
        diagonals: bool,
        passable: impl Fn(TilePos) -> bool,
    ) -> &[Step] {
        self.buf.clear();
        // Orthogonal passability is needed by the diagonal corner check, so
        // it is evaluated once per direction.
        let mut open = [false; 4];
        for (i, d) in ORTHOGONAL.into_iter().enumerate() {
            let n = p + d;
            open[i] = passable(n);
            if open[i] {
                self.buf.push(Step {
                    to: n,
                    len: ORTHOGONAL_STEP,
                });
            }
        }
        if !diagonals {
            return &self.buf;
        }
        for d in DIAGONAL {
            let n = p + d;
            let side_x = if d.x > 0 { open[1] } else { open[3] };
            let side_z = if d.z > 0 { open[2] } else { open[0] };
            if (side_x || side_z) && passable(n) {
                self.buf.push(Step {
                    to: n,
                    len: DIAGONAL_STEP,
                });
            }
        }
        &self.buf
    }
}
