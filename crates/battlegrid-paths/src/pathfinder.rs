use battlegrid_core::{Locomotion, TerrainQuery, TilePos, WorldPoint};

use crate::config::PathConfig;
use crate::distance::manhattan;
use crate::error::QueryError;
use crate::neighbors::is_legal_step;
use crate::passability::{BlockedTiles, PassabilityLayer};
use crate::postprocess;
use crate::search::SearchParams;

/// Route finder for one battlefield map.
///
/// Holds the terrain query, the current structure overlay and the
/// configuration. Queries take `&self`: all search state is created and
/// dropped inside each call, so a `Pathfinder` can serve any number of
/// queries in a row, or in parallel if `T` allows sharing.
///
/// A query that hits its node budget returns the best route it found so far
/// through the same type as a complete one. Callers that want a fresh
/// attempt simply query again later.
pub struct Pathfinder<T> {
    layer: PassabilityLayer<T>,
    config: PathConfig,
    /// Cheapest terrain multiplier on the map; scales the heuristic.
    min_cost: f64,
}

impl<T: TerrainQuery> Pathfinder<T> {
    /// Create a new `Pathfinder` over `terrain` with the default
    /// [`PathConfig`] and no structures.
    pub fn new(terrain: T) -> Self {
        Self::with_config(terrain, PathConfig::default())
    }

    /// Create a new `Pathfinder` with the given configuration.
    ///
    /// Scans the whole map once for its cheapest terrain.
    pub fn with_config(terrain: T, config: PathConfig) -> Self {
        let layer = PassabilityLayer::new(terrain);
        let min_cost = layer.min_cost_multiplier();
        Self {
            layer,
            config,
            min_cost,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &PathConfig {
        &self.config
    }

    /// Replace the configuration. Affects subsequent queries only.
    pub fn set_config(&mut self, config: PathConfig) {
        self.config = config;
    }

    pub fn terrain(&self) -> &T {
        self.layer.terrain()
    }

    pub fn layer(&self) -> &PassabilityLayer<T> {
        &self.layer
    }

    /// Rescan the terrain for its cheapest tile. Call after the terrain
    /// behind `T` changed, or the heuristic may overestimate.
    pub fn refresh_terrain(&mut self) {
        self.min_cost = self.layer.min_cost_multiplier();
    }

    /// Replace the set of tiles occupied by structures.
    pub fn update_blocked_tiles<I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = TilePos>,
    {
        self.set_blocked_tiles(tiles.into_iter().collect());
    }

    /// Swap in an existing structure snapshot without copying it.
    pub fn set_blocked_tiles(&mut self, blocked: BlockedTiles) {
        log::debug!("blocked-tile overlay replaced: {} tiles", blocked.len());
        self.layer.set_blocked_tiles(blocked);
    }

    pub fn blocked_tiles(&self) -> &BlockedTiles {
        self.layer.blocked_tiles()
    }

    pub fn is_passable(&self, tile: TilePos, loco: Locomotion) -> bool {
        self.layer.is_passable(tile, loco)
    }

    /// See [`PassabilityLayer::find_nearest`].
    pub fn find_nearest(
        &self,
        tile: TilePos,
        loco: Locomotion,
        max_ring_radius: i32,
    ) -> Option<TilePos> {
        self.layer.find_nearest(tile, loco, max_ring_radius)
    }

    /// See [`PassabilityLayer::route_cost`].
    pub fn route_cost(&self, tiles: &[TilePos]) -> f64 {
        self.layer.route_cost(tiles)
    }

    /// Find a route from `start` to `goal` with the configured node budget.
    ///
    /// Returns the simplified waypoints at tile centers, first and last
    /// being the (possibly relocated) start and goal, or `None` when no
    /// route exists. Off-map coordinates are a caller bug: they panic in
    /// debug builds and yield `None` in release builds.
    pub fn find_path(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
    ) -> Option<Vec<WorldPoint>> {
        self.find_path_with_budget(start, goal, loco, self.config.node_budget)
    }

    /// [`find_path`](Self::find_path) with an explicit node budget in place
    /// of the configured one.
    pub fn find_path_with_budget(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
        node_budget: usize,
    ) -> Option<Vec<WorldPoint>> {
        degrade(self.try_find_path(start, goal, loco, node_budget))
    }

    /// [`find_path`](Self::find_path) between two world positions, each
    /// mapped to the tile containing it.
    pub fn find_path_world(
        &self,
        from: WorldPoint,
        to: WorldPoint,
        loco: Locomotion,
    ) -> Option<Vec<WorldPoint>> {
        let ts = self.layer.tile_size();
        self.find_path(from.to_tile(ts), to.to_tile(ts), loco)
    }

    /// Like [`find_path_with_budget`](Self::find_path_with_budget) but
    /// returns every tile of the route, unsimplified.
    pub fn find_tile_path(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
        node_budget: usize,
    ) -> Option<Vec<TilePos>> {
        degrade(self.try_find_tile_path(start, goal, loco, node_budget))
    }

    /// Fallible form of [`find_path_with_budget`](Self::find_path_with_budget).
    ///
    /// Malformed queries return a [`QueryError`] in every build profile.
    /// `Ok(None)` means no route exists.
    pub fn try_find_path(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
        node_budget: usize,
    ) -> Result<Option<Vec<WorldPoint>>, QueryError> {
        let tiles = self.try_find_tile_path(start, goal, loco, node_budget)?;
        let ts = self.layer.tile_size();
        Ok(tiles.map(|t| postprocess::to_world(&postprocess::simplify(&t), ts)))
    }

    /// Fallible form of [`find_tile_path`](Self::find_tile_path).
    pub fn try_find_tile_path(
        &self,
        start: TilePos,
        goal: TilePos,
        loco: Locomotion,
        node_budget: usize,
    ) -> Result<Option<Vec<TilePos>>, QueryError> {
        self.validate(start, goal)?;

        let Some(start) = self.resolve(start, loco, "start") else {
            return Ok(None);
        };
        let Some(goal) = self.resolve(goal, loco, "goal") else {
            return Ok(None);
        };

        if start == goal {
            return Ok(Some(vec![start]));
        }
        if self.is_single_step(start, goal, loco) {
            return Ok(Some(vec![start, goal]));
        }

        let params = SearchParams {
            node_budget,
            heuristic_scale: self.min_cost,
            diagonals: self.config.allow_diagonals,
        };
        match self.layer.astar(start, goal, loco, &params) {
            Some(outcome) => {
                log::debug!(
                    "{} route {start} -> {goal} ({loco}): {} tiles, {} expansions, {} nodes",
                    if outcome.reached_goal { "complete" } else { "partial" },
                    outcome.tiles.len(),
                    outcome.expanded,
                    outcome.touched
                );
                Ok(Some(outcome.tiles))
            }
            None => {
                log::debug!("no route {start} -> {goal} ({loco})");
                Ok(None)
            }
        }
    }

    fn validate(&self, start: TilePos, goal: TilePos) -> Result<(), QueryError> {
        let bounds = self.layer.bounds();
        if bounds.is_empty() {
            return Err(QueryError::EmptyGrid);
        }
        let ts = self.layer.tile_size();
        if !(ts.is_finite() && ts > 0.0) {
            return Err(QueryError::InvalidTileSize(ts));
        }
        for tile in [start, goal] {
            if !bounds.contains(tile) {
                return Err(QueryError::OutOfBounds { tile, bounds });
            }
        }
        Ok(())
    }

    /// `tile` itself when passable, else the nearest passable tile within
    /// the relocation radius.
    fn resolve(&self, tile: TilePos, loco: Locomotion, what: &str) -> Option<TilePos> {
        if self.layer.is_passable(tile, loco) {
            return Some(tile);
        }
        let found = self
            .layer
            .find_nearest(tile, loco, self.config.relocation_radius);
        match found {
            Some(t) => log::debug!("{what} {tile} impassable for {loco}, relocated to {t}"),
            None => log::debug!(
                "{what} {tile} impassable for {loco}, nothing passable within {} rings",
                self.config.relocation_radius
            ),
        }
        found
    }

    fn is_single_step(&self, from: TilePos, to: TilePos, loco: Locomotion) -> bool {
        let passable = |t| self.layer.is_passable(t, loco);
        if self.config.allow_diagonals {
            is_legal_step(from, to, passable)
        } else {
            manhattan(from, to) == 1 && passable(to)
        }
    }
}

/// Loud in debug builds, quiet `None` in release builds.
fn degrade<R>(result: Result<Option<R>, QueryError>) -> Option<R> {
    if cfg!(debug_assertions) {
        if let Err(err) = &result {
            panic!("malformed path query: {err}");
        }
    }
    degrade_quiet(result)
}

fn degrade_quiet<R>(result: Result<Option<R>, QueryError>) -> Option<R> {
    result.unwrap_or_else(|err| {
        log::warn!("malformed path query answered with no path: {err}");
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use battlegrid_core::{Bounds, TerrainKind, TerrainMap};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::distance::octile;
    use crate::postprocess::expand_polyline;

    const V: Locomotion = Locomotion::Vehicle;
    const I: Locomotion = Locomotion::Infantry;

    fn t(x: i32, z: i32) -> TilePos {
        TilePos::new(x, z)
    }

    /// Tiles underlying a waypoint polyline.
    fn underlying<Q: TerrainQuery>(pf: &Pathfinder<Q>, path: &[WorldPoint]) -> Vec<TilePos> {
        let ts = pf.terrain().tile_size();
        let corners: Vec<TilePos> = path.iter().map(|p| p.to_tile(ts)).collect();
        expand_polyline(&corners)
    }

    fn assert_route_valid<Q: TerrainQuery>(
        pf: &Pathfinder<Q>,
        path: &[WorldPoint],
        loco: Locomotion,
    ) {
        let tiles = underlying(pf, path);
        for w in tiles.windows(2) {
            assert!(
                is_legal_step(w[0], w[1], |x| pf.is_passable(x, loco)),
                "illegal step {} -> {} for {loco}",
                w[0],
                w[1]
            );
        }
        for tile in &tiles {
            assert!(pf.is_passable(*tile, loco), "{tile} impassable for {loco}");
        }
    }

    #[test]
    fn same_tile_is_single_center_point() {
        let pf = Pathfinder::new(TerrainMap::new(8, 8, 2.0));
        let path = pf.find_path(t(3, 4), t(3, 4), V).unwrap();
        assert_eq!(path, vec![WorldPoint::new(7.0, 9.0)]);
    }

    #[test]
    fn adjacent_tiles_give_two_points() {
        let pf = Pathfinder::new(TerrainMap::new(8, 8, 1.0));
        assert_eq!(pf.find_path(t(3, 4), t(4, 4), V).unwrap().len(), 2);
        assert_eq!(pf.find_path(t(3, 4), t(4, 5), V).unwrap().len(), 2);
        assert_eq!(pf.find_tile_path(t(3, 4), t(2, 3), I, 10).unwrap(), vec![t(3, 4), t(2, 3)]);
    }

    #[test]
    fn diagonal_neighbour_behind_sealed_corner_is_not_adjacent() {
        let mut map = TerrainMap::new(6, 6, 1.0);
        map.set(t(3, 2), TerrainKind::Cliff);
        map.set(t(2, 3), TerrainKind::Cliff);
        let pf = Pathfinder::new(map);
        let tiles = pf.find_tile_path(t(2, 2), t(3, 3), I, 100).unwrap();
        assert!(tiles.len() > 2);
        assert_eq!(tiles.first(), Some(&t(2, 2)));
        assert_eq!(tiles.last(), Some(&t(3, 3)));
    }

    #[test]
    fn open_field_scenario() {
        let pf = Pathfinder::new(TerrainMap::new(16, 16, 2.0));
        let path = pf.find_path(t(0, 0), t(5, 0), V).unwrap();
        assert_eq!(path.first(), Some(&WorldPoint::new(1.0, 1.0)));
        assert_eq!(path.last(), Some(&WorldPoint::new(11.0, 1.0)));
        // A straight run simplifies away every intermediate tile.
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn wall_forces_route_around_band() {
        let mut map = TerrainMap::new(10, 10, 1.0);
        map.fill(Bounds::new(3, 0, 4, 5), TerrainKind::Cliff);
        let pf = Pathfinder::new(map);
        for (from, to) in [(t(0, 0), t(6, 0)), (t(1, 4), t(9, 2)), (t(8, 1), t(2, 3))] {
            for loco in [V, I] {
                let path = pf.find_path(from, to, loco).unwrap();
                assert_route_valid(&pf, &path, loco);
                for tile in underlying(&pf, &path) {
                    if tile.x == 3 {
                        assert!(tile.z > 4, "crossed wall at {tile}");
                    }
                }
            }
        }
    }

    #[test]
    fn rough_corridor_only_for_infantry() {
        let map = TerrainMap::from_ascii(
            "
            ....^....
            ....^....
            ....^....
            ....^....
            .........
            ",
            1.0,
        )
        .unwrap();
        let pf = Pathfinder::new(map);
        let crosses = |path: &[WorldPoint]| {
            underlying(&pf, path)
                .iter()
                .any(|x| x.x == 4 && x.z < 4)
        };

        let vehicle = pf.find_path(t(0, 0), t(8, 0), V).unwrap();
        assert_route_valid(&pf, &vehicle, V);
        assert!(!crosses(&vehicle));

        let infantry = pf.find_path(t(0, 0), t(8, 0), I).unwrap();
        assert_route_valid(&pf, &infantry, I);
        assert!(crosses(&infantry));
    }

    #[test]
    fn prefers_cheaper_terrain() {
        let map = TerrainMap::from_ascii(
            "
            .=======.
            .#######.
            .:::::::.
            ",
            1.0,
        )
        .unwrap();
        let pf = Pathfinder::new(map);
        let tiles = pf.find_tile_path(t(0, 1), t(8, 1), V, 1000).unwrap();
        assert!(tiles.iter().any(|x| x.z == 0));
        assert!(tiles.iter().all(|x| x.z != 2));
        let via_sand = [t(0, 1), t(1, 2), t(7, 2), t(8, 1)];
        assert!(pf.route_cost(&tiles) < pf.route_cost(&via_sand));
    }

    #[test]
    fn random_fields_yield_valid_routes() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..40 {
            let mut map = TerrainMap::new(24, 24, 1.5);
            for tile in Bounds::from_size(24, 24) {
                let kind = match rng.random_range(0..10u32) {
                    0 | 1 => TerrainKind::Cliff,
                    2 => TerrainKind::Rough,
                    3 => TerrainKind::Sand,
                    4 => TerrainKind::Road,
                    5 => TerrainKind::Mud,
                    _ => TerrainKind::Grass,
                };
                map.set(tile, kind);
            }
            let mut pf = Pathfinder::new(map);
            let blocked: Vec<TilePos> = (0..20)
                .map(|_| t(rng.random_range(0..24), rng.random_range(0..24)))
                .collect();
            pf.update_blocked_tiles(blocked);

            let from = t(rng.random_range(0..24), rng.random_range(0..24));
            let to = t(rng.random_range(0..24), rng.random_range(0..24));
            for loco in [V, I] {
                if let Some(path) = pf.find_path(from, to, loco) {
                    assert!(!path.is_empty());
                    assert_route_valid(&pf, &path, loco);
                }
            }
        }
    }

    #[test]
    fn small_budget_still_makes_progress() {
        let mut map = TerrainMap::new(60, 60, 1.0);
        // Staggered walls that force a long search.
        for x in (10..50).step_by(8) {
            map.fill(Bounds::new(x, 0, x + 1, 55), TerrainKind::Cliff);
            map.fill(Bounds::new(x + 4, 5, x + 5, 60), TerrainKind::Cliff);
        }
        let pf = Pathfinder::new(map);
        let start = t(2, 30);
        let goal = t(57, 30);

        let full = pf.find_tile_path(start, goal, V, usize::MAX).unwrap();
        assert_eq!(full.last(), Some(&goal));

        for budget in [1, 5, 40, 200] {
            let tiles = pf.find_tile_path(start, goal, V, budget).unwrap();
            assert_eq!(tiles.first(), Some(&start));
            let end = *tiles.last().unwrap();
            assert!(
                end == goal || octile(end, goal) < octile(start, goal) || budget == 1,
                "budget {budget} ended at {end}"
            );
            for w in tiles.windows(2) {
                assert!(is_legal_step(w[0], w[1], |x| pf.is_passable(x, V)));
            }
        }
    }

    #[test]
    fn blocked_update_reroutes() {
        let mut pf = Pathfinder::new(TerrainMap::new(10, 10, 1.0));
        let before = pf.find_tile_path(t(0, 5), t(9, 5), V, 1000).unwrap();
        assert!(before.contains(&t(5, 5)));

        pf.update_blocked_tiles([t(5, 4), t(5, 5), t(5, 6)]);
        let after = pf.find_tile_path(t(0, 5), t(9, 5), V, 1000).unwrap();
        for b in [t(5, 4), t(5, 5), t(5, 6)] {
            assert!(!after.contains(&b));
        }
        // The earlier result is untouched by the update.
        assert!(before.contains(&t(5, 5)));

        pf.update_blocked_tiles(std::iter::empty());
        let cleared = pf.find_tile_path(t(0, 5), t(9, 5), V, 1000).unwrap();
        assert!(cleared.contains(&t(5, 5)));
    }

    #[test]
    fn blocked_goal_relocates_to_only_open_neighbor() {
        let mut pf = Pathfinder::new(TerrainMap::new(12, 12, 1.0));
        let blocked: BlockedTiles = Bounds::new(4, 4, 7, 7)
            .iter()
            .filter(|&x| x != t(6, 5))
            .collect();
        pf.set_blocked_tiles(blocked);

        assert_eq!(pf.find_nearest(t(5, 5), I, 4), Some(t(6, 5)));
        let tiles = pf.find_tile_path(t(0, 0), t(5, 5), I, 1000).unwrap();
        assert_eq!(tiles.last(), Some(&t(6, 5)));
        let path = pf.find_path(t(0, 0), t(5, 5), I).unwrap();
        assert_eq!(path.last(), Some(&WorldPoint::tile_center(t(6, 5), 1.0)));
    }

    #[test]
    fn blocked_start_relocates() {
        let mut map = TerrainMap::new(8, 8, 1.0);
        map.set(t(0, 0), TerrainKind::Rough);
        let pf = Pathfinder::new(map);
        let tiles = pf.find_tile_path(t(0, 0), t(5, 0), V, 1000).unwrap();
        assert!(tiles[0] != t(0, 0));
        assert!(pf.is_passable(tiles[0], V));
        // Infantry may stand on rough ground and starts where asked.
        let tiles = pf.find_tile_path(t(0, 0), t(5, 0), I, 1000).unwrap();
        assert_eq!(tiles[0], t(0, 0));
    }

    #[test]
    fn unresolvable_goal_is_no_path() {
        let mut map = TerrainMap::new(20, 20, 1.0);
        map.fill(Bounds::new(5, 5, 20, 20), TerrainKind::Cliff);
        let pf = Pathfinder::with_config(
            map,
            PathConfig {
                relocation_radius: 2,
                ..PathConfig::default()
            },
        );
        assert_eq!(pf.find_path(t(0, 0), t(15, 15), I), None);
        // Within reach of the relocation radius the query succeeds.
        assert!(pf.find_path(t(0, 0), t(6, 6), I).is_some());
    }

    #[test]
    fn enclosed_goal_is_no_path() {
        let mut map = TerrainMap::new(12, 12, 1.0);
        map.fill(Bounds::new(6, 6, 11, 11), TerrainKind::Cliff);
        map.fill(Bounds::new(7, 7, 10, 10), TerrainKind::Grass);
        let pf = Pathfinder::new(map);
        assert_eq!(pf.find_path(t(0, 0), t(8, 8), V), None);
    }

    #[test]
    fn malformed_queries_are_errors() {
        let pf = Pathfinder::new(TerrainMap::new(4, 4, 1.0));
        assert!(matches!(
            pf.try_find_path(t(-1, 0), t(2, 2), V, 10),
            Err(QueryError::OutOfBounds { .. })
        ));
        assert!(matches!(
            pf.try_find_path(t(0, 0), t(4, 2), V, 10),
            Err(QueryError::OutOfBounds { .. })
        ));

        let empty = Pathfinder::new(TerrainMap::new(0, 0, 1.0));
        assert_eq!(
            empty.try_find_tile_path(t(0, 0), t(0, 0), V, 10),
            Err(QueryError::EmptyGrid)
        );

        let bad_size = Pathfinder::new(TerrainMap::new(4, 4, 0.0));
        assert!(matches!(
            bad_size.try_find_path(t(0, 0), t(1, 1), V, 10),
            Err(QueryError::InvalidTileSize(_))
        ));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "malformed path query")]
    fn off_grid_request_panics_in_debug() {
        let pf = Pathfinder::new(TerrainMap::new(4, 4, 1.0));
        let _ = pf.find_path(t(0, 0), t(9, 9), V);
    }

    #[test]
    fn malformed_query_degrades_to_no_path() {
        let pf = Pathfinder::new(TerrainMap::new(4, 4, 1.0));
        let result = pf.try_find_tile_path(t(0, 0), t(9, 9), V, 10);
        assert!(result.is_err());
        assert_eq!(degrade_quiet(result), None);
        // Well-formed answers pass through untouched.
        assert_eq!(degrade_quiet(Ok(Some(vec![t(1, 1)]))), Some(vec![t(1, 1)]));
        assert_eq!(degrade_quiet::<Vec<TilePos>>(Ok(None)), None);
        assert_eq!(degrade(Ok(Some(3))), Some(3));
    }

    #[test]
    fn world_space_query() {
        let pf = Pathfinder::new(TerrainMap::new(16, 16, 2.0));
        let path = pf
            .find_path_world(WorldPoint::new(0.3, 1.7), WorldPoint::new(10.1, 0.2), V)
            .unwrap();
        assert_eq!(path, vec![WorldPoint::new(1.0, 1.0), WorldPoint::new(11.0, 1.0)]);
    }

    #[test]
    fn four_way_config() {
        let pf = Pathfinder::with_config(
            TerrainMap::new(8, 8, 1.0),
            PathConfig {
                allow_diagonals: false,
                ..PathConfig::default()
            },
        );
        // Diagonal neighbours are two orthogonal steps apart.
        assert_eq!(pf.find_tile_path(t(2, 2), t(3, 3), V, 100).unwrap().len(), 3);
        let tiles = pf.find_tile_path(t(0, 0), t(4, 3), V, 1000).unwrap();
        assert_eq!(tiles.len(), 8);
        for w in tiles.windows(2) {
            assert_eq!(manhattan(w[0], w[1]), 1);
        }
    }

    #[test]
    fn refresh_terrain_tracks_cheapest_tile() {
        let mut map = TerrainMap::filled(6, 6, 1.0, TerrainKind::Sand);
        map.set(t(5, 5), TerrainKind::Road);
        let pf = Pathfinder::new(&map);
        assert_eq!(pf.min_cost, f64::from(TerrainKind::Road.cost_multiplier()));

        let mut pf = Pathfinder::new(TerrainMap::filled(6, 6, 1.0, TerrainKind::Mud));
        assert_eq!(pf.min_cost, 2.0);
        pf.refresh_terrain();
        assert_eq!(pf.min_cost, 2.0);
    }
}
