//! Headless command line for Chained scenes.
//!
//! Usage:
//!   chained play scenes/level1.json --frames 300
//!   chained inspect scenes/level1.json
//!   chained palette assets/textures/sprites.json
//!   chained scenes scenes/

use std::path::PathBuf;

use anyhow::{Context, Result};
use chained_engine::EngineConfig;
use chained_runner::commands;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chained")]
#[command(about = "Run and inspect Chained scenes without a window")]
struct Cli {
    /// Engine config file (JSON). Defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scene and print the final object transforms
    Play {
        scene: PathBuf,
        /// Number of frames to run
        #[arg(long, default_value_t = 120)]
        frames: u32,
        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        /// Emit collider outlines into each frame
        #[arg(long)]
        debug_physics: bool,
    },
    /// Print a scene file's objects and camera
    Inspect { scene: PathBuf },
    /// List the asset palette of a sprite atlas (defaults to the configured atlas)
    Palette { atlas: Option<PathBuf> },
    /// List scene files (defaults to the configured scenes directory)
    Scenes { dir: Option<PathBuf> },
}

fn load_config(path: Option<&PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    let output = match cli.command {
        Commands::Play { scene, frames, dt, debug_physics } => {
            config.debug_physics |= debug_physics;
            commands::play(config, &scene, frames, dt)?
        }
        Commands::Inspect { scene } => commands::inspect(&scene)?,
        Commands::Palette { atlas } => {
            let atlas = atlas.unwrap_or_else(|| config.atlas_path.clone());
            commands::palette(&atlas)?
        }
        Commands::Scenes { dir } => {
            let dir = dir.unwrap_or_else(|| config.scenes_dir.clone());
            commands::scenes(&dir)?
        }
    };
    print!("{}", output);
    Ok(())
}
