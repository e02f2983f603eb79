//! `gaia-populate`: scatter gaia resources over a scenario map.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p gaia-cli -- list` to see the maps available, then
//! `cargo run -p gaia-cli -- populate <map>`.

mod commands;
mod error;
mod maps;

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gaia_config::{CliArgs, Config};
use gaia_placement::{ClusterRequest, ResourceType};
use gaia_terrain::{DecodedTerrain, WorldPoint};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "gaia-populate", about = "Populate scenario maps with gaia resources")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    overrides: CliArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List maps that have both a terrain file and an entity list.
    List,

    /// List the resource types `cluster` accepts, with their defaults.
    Resources,

    /// Decode a terrain file and print what it holds.
    Inspect {
        /// Map name; defaults to the last one used.
        map: Option<String>,

        /// Number of random altitude samples to print.
        #[arg(long, default_value_t = 5)]
        samples: usize,
    },

    /// Scatter resources over the whole map.
    Populate {
        /// Map name; defaults to the last one used.
        map: Option<String>,

        /// World extent to place over instead of the decoded one.
        #[arg(long)]
        map_dimension: Option<f64>,
    },

    /// Place one cluster of a resource type around a point.
    Cluster {
        /// Map name; defaults to the last one used.
        map: Option<String>,

        /// Resource type id, e.g. `alpine_forest` or `metals`.
        #[arg(long)]
        resource_type: ResourceType,

        #[arg(long)]
        x: f64,

        #[arg(long)]
        z: f64,

        /// Fraction of the radius to use; defaults per resource type.
        #[arg(long)]
        density: Option<f64>,

        /// Cluster radius; defaults per resource type.
        #[arg(long)]
        radius: Option<f64>,

        /// Number of entities; defaults per resource type.
        #[arg(long)]
        count: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_dir = cli.overrides.config.clone().unwrap_or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&cli.overrides);

    let log_dir = config_dir.join("logs");
    gaia_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(cli.command, &config, &config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &Config, config_dir: &Path) -> Result<(), CliError> {
    config.validate()?;

    let seed = config.placement.seed.unwrap_or_else(rand::random);
    info!(seed, "seeded random source");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    match command {
        Command::List => {
            let maps_dir = &config.output.maps_dir;
            let maps = maps::list_maps(maps_dir).map_err(|source| CliError::ListMaps {
                path: maps_dir.clone(),
                source,
            })?;
            if maps.is_empty() {
                println!("no maps in {}", maps_dir.display());
            }
            for map in maps {
                println!("{map}");
            }
        }
        Command::Resources => {
            for line in resource_lines() {
                println!("{line}");
            }
        }
        Command::Inspect { map, samples } => {
            let files = commands::select_map(config, map.as_deref())?;
            let terrain = commands::load_terrain(&files.terrain, config, &mut rng)?;
            print_terrain(&files.name, &terrain, samples, &mut rng);
        }
        Command::Populate { map, map_dimension } => {
            let files = commands::select_map(config, map.as_deref())?;
            let report = commands::populate(config, &files, map_dimension, &mut rng)?;
            let rejections = &report.outcome.rejections;
            println!("map dimension:        {:.2}", report.map_dimension);
            println!("existing entities:    {}", report.existing_entities);
            println!("candidates:           {}", report.outcome.candidates_considered);
            println!("added:                {}", report.outcome.entities.len());
            println!("rejected (bounds):    {}", rejections.bounds);
            println!("rejected (exclusion): {}", rejections.exclusion);
            println!("rejected (water):     {}", rejections.water);
            println!("written to {}", report.output.display());
            remember_map(config_dir, &files.name);
        }
        Command::Cluster {
            map,
            resource_type,
            x,
            z,
            density,
            radius,
            count,
        } => {
            let files = commands::select_map(config, map.as_deref())?;
            let mut request = ClusterRequest::with_defaults(resource_type, WorldPoint::new(x, z));
            if let Some(density) = density {
                request.density = density;
            }
            if let Some(radius) = radius {
                request.radius = radius;
            }
            if let Some(count) = count {
                request.count = count;
            }
            let report = commands::cluster(config, &files, request, &mut rng)?;
            println!(
                "added {} {} entities from {} to {}",
                report.entities.len(),
                resource_type.display_name().to_lowercase(),
                report.source.display(),
                report.output.display()
            );
            remember_map(config_dir, &files.name);
        }
    }
    Ok(())
}

fn resource_lines() -> Vec<String> {
    ResourceType::ALL
        .iter()
        .map(|&resource_type| {
            let defaults = resource_type.defaults();
            format!(
                "{:<22} {:<22} {}  density {:.2}, radius {:.0}, count {}",
                resource_type.id(),
                resource_type.display_name(),
                resource_type.color(),
                defaults.density,
                defaults.radius,
                defaults.count
            )
        })
        .collect()
}

/// Persist the map choice without also persisting this run's CLI overrides.
fn remember_map(config_dir: &Path, map: &str) {
    let result = Config::load_or_create(config_dir).and_then(|mut stored| {
        stored.remember_map(map);
        stored.save(config_dir)
    });
    if let Err(e) = result {
        warn!("Failed to remember map {map}: {e}");
    }
}

fn print_terrain(name: &str, terrain: &DecodedTerrain, samples: usize, rng: &mut ChaCha8Rng) {
    println!("map:            {name}");
    println!("format:         {}", terrain.format);
    if let Some(header) = &terrain.header {
        println!(
            "header:         version {}, data size {}, {} patches",
            header.version, header.data_size, header.map_size_patches
        );
    }
    let size = terrain.heightmap.size();
    println!("heightmap:      {size} x {size}");
    println!("map dimension:  {:.2}", terrain.map_dimension);
    if let Some(stats) = terrain.heightmap.altitude_stats() {
        println!("altitude:       {:.2} to {:.2}", stats.min, stats.max);
    }
    for (cell, altitude) in terrain.heightmap.sample_cells(rng, samples) {
        println!("  [{:>4}, {:>4}] {altitude:.2}", cell.row, cell.col);
    }

    println!("textures:       {}", terrain.textures.len());
    for (i, texture) in terrain.textures.names().iter().enumerate() {
        println!("  {i:>3} {texture}");
    }
    let (rows, cols) = terrain.tiles.dimensions();
    println!("tiles:          {rows} x {cols}");
    let special = terrain.tiles.special_count(terrain.textures.len());
    if special > 0 {
        println!("  {special} tiles reference reserved texture indices");
    }
}
