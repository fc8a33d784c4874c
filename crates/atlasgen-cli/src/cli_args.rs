//! CLI argument definitions for the atlasgen command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use atlasgen_backend_svg::{DEFAULT_SVGEXPORT_PATH, DEFAULT_TIMEOUT_SECS};
use atlasgen_cli::commands::build::{DEFAULT_INPUT_DIR, DEFAULT_OUT_DIR};
use atlasgen_spec::SizeClass;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// atlasgen - SVG sprite atlas builder
#[derive(Parser)]
#[command(name = "atlasgen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build one atlas and metadata file per size class
    Build {
        /// Directory containing icon SVGs and cube directories
        #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Output directory for textures-<name>.png and .png.json
        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,

        /// Size class as NAME=PIXELS; repeat to build several (default: pixel=16, simple=64, fancy=256, x-fancy=1024)
        #[arg(long = "size", value_name = "NAME=PX")]
        sizes: Vec<SizeClass>,

        /// Path to the node executable (default: ATLASGEN_NODE or node in PATH)
        #[arg(long)]
        node: Option<PathBuf>,

        /// Path to the svgexport script
        #[arg(long, default_value = DEFAULT_SVGEXPORT_PATH)]
        svgexport: PathBuf,

        /// Timeout for one rasterization, in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,

        /// Write a JSON build report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Suppress nested timing output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the sprites in an atlas metadata file
    Inspect {
        /// Path to a textures-<name>.png.json file
        #[arg(short, long)]
        metadata: PathBuf,
    },

    /// Check the rasterizer toolchain and output directory
    Doctor {
        /// Path to the node executable
        #[arg(long)]
        node: Option<PathBuf>,

        /// Path to the svgexport script
        #[arg(long, default_value = DEFAULT_SVGEXPORT_PATH)]
        svgexport: PathBuf,

        /// Output directory to check
        #[arg(short, long, default_value = DEFAULT_OUT_DIR)]
        out: PathBuf,
    },
}
