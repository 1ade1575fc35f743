//! battlegrid-demo: plan a route across a battlefield and print it.
//!
//! ```text
//! RUST_LOG=debug battlegrid-demo --seed 7 --from 0,0 --to 47,23 --infantry
//! battlegrid-demo --map field.txt --config paths.json --budget 200
//! ```

mod field;
mod render;

use std::path::PathBuf;

use battlegrid_core::{Locomotion, TerrainMap, TerrainQuery, TilePos};
use battlegrid_paths::{PathConfig, Pathfinder, postprocess};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(version, about = "Plan a route across a battlefield tile map")]
struct Cli {
    /// ASCII terrain map to load instead of generating one.
    #[arg(long)]
    map: Option<PathBuf>,

    /// JSON file with pathfinding settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Width of a generated map.
    #[arg(long, default_value_t = 48)]
    width: i32,

    /// Height of a generated map.
    #[arg(long, default_value_t = 24)]
    height: i32,

    /// Seed for map generation and structure placement.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// World units per tile.
    #[arg(long, default_value_t = 2.0)]
    tile_size: f32,

    /// Number of random structure tiles to place.
    #[arg(long, default_value_t = 20)]
    structures: usize,

    /// Start tile as `x,z`.
    #[arg(long, value_parser = parse_tile, default_value = "0,0")]
    from: TilePos,

    /// Goal tile as `x,z`; defaults to the far corner.
    #[arg(long, value_parser = parse_tile)]
    to: Option<TilePos>,

    /// Plan for infantry instead of vehicles.
    #[arg(long)]
    infantry: bool,

    /// Override the configured node budget.
    #[arg(long)]
    budget: Option<usize>,
}

fn parse_tile(s: &str) -> Result<TilePos, String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{s}`"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in `{s}`: {e}"))?;
    let z = z.trim().parse::<i32>().map_err(|e| format!("bad z in `{s}`: {e}"))?;
    Ok(TilePos::new(x, z))
}

fn load_config(path: Option<&PathBuf>) -> Result<PathConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            let cfg = serde_json::from_str(&text)?;
            log::info!("pathfinding settings loaded from {}", p.display());
            Ok(cfg)
        }
        None => Ok(PathConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(budget) = cli.budget {
        config.node_budget = budget;
    }

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let map = match &cli.map {
        Some(path) => TerrainMap::from_ascii(&std::fs::read_to_string(path)?, cli.tile_size)?,
        None => field::generate(
            cli.width,
            cli.height,
            cli.tile_size,
            &field::default_rules(),
            &mut rng,
        ),
    };
    let structures = field::random_structures(&map, cli.structures, &mut rng);
    let bounds = map.bounds();

    let start = cli.from;
    let goal = cli
        .to
        .unwrap_or_else(|| TilePos::new(bounds.max.x - 1, bounds.max.z - 1));
    for tile in [start, goal] {
        if !bounds.contains(tile) {
            return Err(format!("tile {tile} is outside the map {bounds}").into());
        }
    }
    let loco = if cli.infantry {
        Locomotion::Infantry
    } else {
        Locomotion::Vehicle
    };

    let mut pathfinder = Pathfinder::with_config(&map, config);
    pathfinder.update_blocked_tiles(
        structures
            .iter()
            .copied()
            .filter(|&t| t != start && t != goal),
    );

    let tiles = pathfinder.find_tile_path(start, goal, loco, config.node_budget);
    let route = tiles.as_deref().unwrap_or_default();
    print!(
        "{}",
        render::render(&map, pathfinder.blocked_tiles(), route, start, goal)
    );

    match tiles {
        Some(tiles) => {
            let waypoints = postprocess::to_world(&postprocess::simplify(&tiles), map.tile_size());
            println!(
                "{loco} route {start} -> {goal}: {} tiles, cost {:.2}, {} waypoints",
                tiles.len(),
                pathfinder.route_cost(&tiles),
                waypoints.len()
            );
            for p in &waypoints {
                println!("  {p}");
            }
        }
        None => println!("{loco}: no route {start} -> {goal}"),
    }
    Ok(())
}
