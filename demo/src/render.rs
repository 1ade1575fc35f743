//! ASCII rendering of a map with a planned route on top.

use std::collections::HashSet;

use battlegrid_core::{TerrainMap, TilePos};
use battlegrid_paths::BlockedTiles;

pub const ROUTE: char = '*';
pub const STRUCTURE: char = 'B';
pub const START: char = 'S';
pub const GOAL: char = 'G';

/// Terrain glyphs, overlaid with structures, the route and its endpoints.
pub fn render(
    map: &TerrainMap,
    blocked: &BlockedTiles,
    route: &[TilePos],
    start: TilePos,
    goal: TilePos,
) -> String {
    let on_route: HashSet<TilePos> = route.iter().copied().collect();
    let mut out = String::new();
    for z in 0..map.height() {
        for x in 0..map.width() {
            let p = TilePos::new(x, z);
            let ch = if p == start {
                START
            } else if p == goal {
                GOAL
            } else if on_route.contains(&p) {
                ROUTE
            } else if blocked.contains(p) {
                STRUCTURE
            } else {
                map.at(p).map_or(' ', |k| k.glyph())
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
