//! # Vtex CLI
//!
//! Command-line inspector for virtual textures.
//!
//! ## Commands
//! - `info` - Summarise a virtual texture descriptor and its tile catalog
//! - `tile` - Resolve one tile request the way a renderer would
//! - `grid` - List the tile grid size of every exposed level of detail

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vtex_core::{VirtualTexture, VirtualTextureOptions, load_virtual_texture};

/// Virtual texture inspector
#[derive(Parser)]
#[command(name = "vtex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of levelN directories to probe
    #[arg(long, default_value_t = vtex_core::config::DEFAULT_MAX_RESOLUTION_LEVELS)]
    pub max_levels: u32,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Summarise a virtual texture
    Info {
        /// Virtual texture descriptor (JSON)
        descriptor: PathBuf,
    },

    /// Resolve a tile request
    Tile {
        /// Virtual texture descriptor (JSON)
        descriptor: PathBuf,

        /// Level of detail (0 = coarsest exposed level)
        #[arg(allow_negative_numbers = true)]
        lod: i32,

        /// Horizontal tile index
        #[arg(allow_negative_numbers = true)]
        u: i32,

        /// Vertical tile index
        #[arg(allow_negative_numbers = true)]
        v: i32,
    },

    /// List tile grid sizes per level of detail
    Grid {
        /// Virtual texture descriptor (JSON)
        descriptor: PathBuf,
    },
}

/// Set up logging; `--verbose` lowers the default filter to debug
pub fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    let options = VirtualTextureOptions::default().with_max_resolution_levels(cli.max_levels);
    run(cli.command, &options).map(|_| ())
}

/// Run one command and return the lines it reported
pub fn run(command: Commands, options: &VirtualTextureOptions) -> Result<Vec<String>> {
    let lines = match command {
        Commands::Info { descriptor } => {
            let vt = open(&descriptor, options)?;
            let stats = vt.stats();
            vec![
                format!("Directory: {}", vt.tile_path().display()),
                format!("Size: {}x{}", vt.width(), vt.height()),
                format!("Tile size: {}", vt.tile_size()),
                format!("Base split: {}", vt.base_split()),
                format!("Resolution levels: {}", vt.resolution_levels()),
                format!("LOD count: {}", vt.lod_count()),
                format!("Tiles: {} ({} nodes)", stats.tiles, stats.nodes),
            ]
        }

        Commands::Tile { descriptor, lod, u, v } => {
            let mut vt = open(&descriptor, options)?;
            vt.begin_usage();
            let tile = vt.get_tile(lod, u, v);
            vt.end_usage();
            match tile.texture {
                Some(texture) => vec![format!(
                    "Tile ({lod}, {u}, {v}): {texture} rect ({}, {}) size ({}, {})",
                    tile.u, tile.v, tile.du, tile.dv
                )],
                None => vec![format!("Tile ({lod}, {u}, {v}): nothing to draw")],
            }
        }

        Commands::Grid { descriptor } => {
            let vt = open(&descriptor, options)?;
            (0..vt.lod_count() as i32)
                .map(|lod| {
                    format!(
                        "LOD {}: {}x{} tiles",
                        lod,
                        vt.u_tile_count(lod),
                        vt.v_tile_count(lod)
                    )
                })
                .collect()
        }
    };

    for line in &lines {
        log::info!("{}", line);
    }
    Ok(lines)
}

fn open(descriptor: &Path, options: &VirtualTextureOptions) -> Result<VirtualTexture> {
    load_virtual_texture(descriptor, options)
        .with_context(|| format!("loading virtual texture {}", descriptor.display()))
}
