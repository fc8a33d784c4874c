//! atlasgen CLI - Command-line interface for building sprite atlases
//!
//! This binary rasterizes SVG icons and cubes at several sizes and packs each
//! size into one texture atlas with JSON metadata.

use atlasgen_backend_svg::ExporterConfig;
use atlasgen_spec::SizeClass;
use clap::Parser;
use std::process::ExitCode;

use atlasgen_cli::commands;
use atlasgen_cli::commands::build::BuildOptions;

mod cli_args;

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            input,
            out,
            sizes,
            node,
            svgexport,
            timeout_secs,
            report,
            quiet,
        } => {
            let sizes = if sizes.is_empty() {
                SizeClass::defaults()
            } else {
                sizes
            };
            let options = BuildOptions::new(input, out)
                .size_classes(sizes)
                .quiet(quiet);
            commands::build::run(
                &options,
                exporter_config(node, svgexport).timeout_secs(timeout_secs),
                report.as_deref(),
            )
        }
        Commands::Inspect { metadata } => commands::inspect::run(&metadata),
        Commands::Doctor {
            node,
            svgexport,
            out,
        } => commands::doctor::run(exporter_config(node, svgexport), &out),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

fn exporter_config(
    node: Option<std::path::PathBuf>,
    svgexport: std::path::PathBuf,
) -> ExporterConfig {
    let config = ExporterConfig::default().svgexport_path(svgexport);
    match node {
        Some(node) => config.node_path(node),
        None => config,
    }
}
