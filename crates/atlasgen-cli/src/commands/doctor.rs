//! Doctor command implementation
//!
//! Checks the rasterizer toolchain and output directory.

use anyhow::Result;
use atlasgen_backend_svg::{ExporterConfig, SvgExporter};
use colored::Colorize;
use std::path::Path;
use std::process::{Command, ExitCode};

/// Run the doctor command
///
/// Checks:
/// - node installation
/// - svgexport script
/// - Output directory permissions
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(exporter: ExporterConfig, out_dir: &Path) -> Result<ExitCode> {
    println!("{}", "atlasgen Doctor".cyan().bold());
    println!("{}", "===============".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} atlasgen-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    let exporter = SvgExporter::with_config(exporter);
    match exporter.resolve_node() {
        Ok(node) => {
            let version = node_version(&node).unwrap_or_else(|| "unknown".to_string());
            println!(
                "  {} node {} ({})",
                "ok".green(),
                version,
                node.display()
            );
        }
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            println!(
                "     {}",
                "Install Node.js from https://nodejs.org/".dimmed()
            );
            all_ok = false;
        }
    }
    match exporter.resolve_svgexport() {
        Ok(path) => {
            println!("  {} svgexport ({})", "ok".green(), path.display());
        }
        Err(e) => {
            println!("  {} {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!(
        "  {} timeout {}s per sprite",
        "->".green(),
        exporter.config().timeout.as_secs()
    );
    println!();

    println!("{}", "Permissions:".bold());
    match check_writable(out_dir) {
        Ok(()) => {
            println!(
                "  {} Output directory is writable ({})",
                "ok".green(),
                out_dir.display()
            );
        }
        Err(e) => {
            println!(
                "  {} Cannot write to output directory {}: {}",
                "!!".red(),
                out_dir.display(),
                e
            );
            all_ok = false;
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Create `dir` if needed and write then remove a scratch file in it.
fn check_writable(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let scratch = dir.join(".atlasgen_write_test");
    std::fs::write(&scratch, "test")?;
    let _ = std::fs::remove_file(&scratch);
    Ok(())
}

fn parse_node_version(output: &str) -> Option<String> {
    // "v20.11.0"
    output
        .lines()
        .next()
        .map(|line| line.trim().trim_start_matches('v').to_string())
        .filter(|v| !v.is_empty())
}

fn node_version(node: &Path) -> Option<String> {
    let output = Command::new(node).arg("--version").output().ok()?;

    if output.status.success() {
        parse_node_version(&String::from_utf8_lossy(&output.stdout))
    } else {
        None
    }
}
