//! Headless terrain generator and ecosystem runner.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use eco_core::{SimulationConfig, WorldConfig};
use eco_world::TerrainGenerator;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Map id; also names the elevation dump file
    #[arg(long, default_value = "world1")]
    id: String,

    /// Grid rows (overrides the config file)
    #[arg(long)]
    width: Option<i32>,

    /// Grid columns (overrides the config file)
    #[arg(long)]
    height: Option<i32>,

    /// Ticks to simulate after generation
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Simulation config as JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for `<id>.txt` elevation dumps
    #[arg(long, default_value = "maps")]
    dump_dir: PathBuf,

    /// Write the final world state as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Seed for reproducible runs (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.log_json);

    let config = load_config(&args)?;
    info!(
        id = %args.id,
        width = config.world.width,
        height = config.world.height,
        "Generating world"
    );

    let mut world = TerrainGenerator::new(config).build(args.id.clone());

    let dump_path = write_dump(&args.dump_dir, &args.id, world.grid())?;
    info!(path = %dump_path.display(), "Wrote elevation dump");

    if args.ticks > 0 {
        let summary = world.run(args.ticks);
        info!(
            ticks = summary.ticks,
            plants = summary.population.plants,
            bunnies = summary.population.bunnies,
            births = summary.births,
            deaths = summary.deaths,
            "Run complete"
        );
    }

    if let Some(path) = &args.snapshot {
        let json = world.snapshot().to_json()?;
        fs::write(path, json)
            .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
        info!(path = %path.display(), "Wrote snapshot");
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::new(WorldConfig::default()),
    };

    if let Some(width) = args.width {
        config.world.width = width;
    }
    if let Some(height) = args.height {
        config.world.height = height;
    }
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn write_dump(dir: &Path, id: &str, grid: &eco_world::Grid) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create dump directory {}", dir.display()))?;
    let path = dir.join(format!("{id}.txt"));

    let file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    grid.write_elevation_dump(&mut out)?;
    out.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["eco-sim"]);
        assert_eq!(args.id, "world1");
        assert_eq!(args.ticks, 0);
        assert!(args.config.is_none());

        let config = load_config(&args).unwrap();
        assert_eq!(config.world.width, 100);
        assert_eq!(config.world.height, 100);
    }

    #[test]
    fn test_dimension_overrides() {
        let args = Args::parse_from(["eco-sim", "--width", "12", "--height", "8", "--seed", "4"]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.world.width, 12);
        assert_eq!(config.world.height, 8);
        assert_eq!(config.world.seed, Some(4));
    }

    #[test]
    fn test_rejects_empty_world() {
        let args = Args::parse_from(["eco-sim", "--width", "0"]);
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_write_dump() {
        let dir = std::env::temp_dir().join(format!("eco-sim-{}", std::process::id()));
        let grid = eco_world::Grid::filled(2, 3, 1);
        let path = write_dump(&dir, "unit", &grid).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "2 3\n1 1 1\n1 1 1\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
