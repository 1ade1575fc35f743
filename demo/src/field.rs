//! Seeded random battlefields.

use battlegrid_core::{Bounds, TerrainKind, TerrainMap, TilePos};
use rand::Rng;

/// How much of the map each terrain patch kind tries to cover.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub kind: TerrainKind,
    /// Number of independent patches.
    pub patches: usize,
    /// Random-walk length of each patch.
    pub walk: usize,
}

pub fn default_rules() -> Vec<FieldRule> {
    vec![
        FieldRule {
            kind: TerrainKind::Sand,
            patches: 4,
            walk: 60,
        },
        FieldRule {
            kind: TerrainKind::Mud,
            patches: 3,
            walk: 40,
        },
        FieldRule {
            kind: TerrainKind::Rough,
            patches: 4,
            walk: 50,
        },
        FieldRule {
            kind: TerrainKind::Cliff,
            patches: 5,
            walk: 45,
        },
    ]
}

fn step(p: TilePos, rng: &mut impl Rng) -> TilePos {
    match rng.random_range(0..4u32) {
        0 => p.shift(1, 0),
        1 => p.shift(-1, 0),
        2 => p.shift(0, 1),
        _ => p.shift(0, -1),
    }
}

/// Grass field with one road in each axis and random-walk patches painted
/// on top, in rule order.
pub fn generate(
    width: i32,
    height: i32,
    tile_size: f32,
    rules: &[FieldRule],
    rng: &mut impl Rng,
) -> TerrainMap {
    let mut map = TerrainMap::new(width, height, tile_size);
    if width <= 0 || height <= 0 {
        return map;
    }

    let road_z = rng.random_range(0..height);
    let road_x = rng.random_range(0..width);
    map.fill(Bounds::new(0, road_z, width, road_z + 1), TerrainKind::Road);
    map.fill(Bounds::new(road_x, 0, road_x + 1, height), TerrainKind::Road);

    let bounds = Bounds::from_size(width, height);
    for rule in rules {
        for _ in 0..rule.patches {
            let mut p = TilePos::new(rng.random_range(0..width), rng.random_range(0..height));
            for _ in 0..rule.walk {
                map.set(p, rule.kind);
                let next = step(p, rng);
                if bounds.contains(next) {
                    p = next;
                }
            }
        }
    }
    map
}

/// Up to `count` distinct random tiles, for the structure overlay.
pub fn random_structures(
    map: &TerrainMap,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<TilePos> {
    let (w, h) = (map.width(), map.height());
    if w <= 0 || h <= 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(count);
    let mut attempts = 0;
    while out.len() < count && attempts < count * 20 {
        attempts += 1;
        let p = TilePos::new(rng.random_range(0..w), rng.random_range(0..h));
        if map.at(p) != Some(TerrainKind::Cliff) && !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn same_seed_same_field() {
        let a = generate(30, 20, 1.0, &default_rules(), &mut StdRng::seed_from_u64(3));
        let b = generate(30, 20, 1.0, &default_rules(), &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
        assert_eq!(a.width(), 30);
        assert_eq!(a.height(), 20);
    }

    #[test]
    fn structures_avoid_cliffs_and_repeats() {
        let mut rng = StdRng::seed_from_u64(9);
        let map = generate(16, 16, 1.0, &default_rules(), &mut rng);
        let tiles = random_structures(&map, 12, &mut rng);
        assert!(tiles.len() <= 12);
        for (i, t) in tiles.iter().enumerate() {
            assert_ne!(map.at(*t), Some(TerrainKind::Cliff));
            assert!(!tiles[..i].contains(t));
        }
    }
}
