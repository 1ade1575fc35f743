/// Tuning knobs for a [`Pathfinder`](crate::Pathfinder).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathConfig {
    /// Maximum number of nodes one search may expand before it settles for
    /// the best partial route. Bounds the worst-case latency of a query.
    pub node_budget: usize,
    /// Largest ring radius scanned when relocating an impassable start or
    /// goal to the nearest passable tile.
    pub relocation_radius: i32,
    /// Allow 8-way movement. When off, units move orthogonally only.
    pub allow_diagonals: bool,
}

impl PathConfig {
    pub const DEFAULT_NODE_BUDGET: usize = 4096;
    pub const DEFAULT_RELOCATION_RADIUS: i32 = 8;
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            node_budget: Self::DEFAULT_NODE_BUDGET,
            relocation_radius: Self::DEFAULT_RELOCATION_RADIUS,
            allow_diagonals: true,
        }
    }
}
