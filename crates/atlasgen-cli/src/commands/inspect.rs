//! Inspect command implementation
//!
//! Prints the sprites recorded in an atlas sidecar and, when the atlas image
//! sits next to it, checks every rectangle lies inside the image.

use anyhow::{Context, Result};
use atlasgen_spec::{AtlasMetadata, ShapeMetadata};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 if the metadata is consistent, 1 if any sprite leaves the atlas
pub fn run(metadata_path: &Path) -> Result<ExitCode> {
    let json = fs::read_to_string(metadata_path)
        .with_context(|| format!("Failed to read metadata: {}", metadata_path.display()))?;
    let metadata = AtlasMetadata::from_json_str(&json)
        .with_context(|| format!("Failed to parse metadata: {}", metadata_path.display()))?;

    println!(
        "{} {} ({} sprites)",
        "Metadata:".blue().bold(),
        metadata_path.display(),
        metadata.len()
    );

    let side = match atlas_image_path(metadata_path).filter(|p| p.is_file()) {
        Some(png) => {
            let (width, height) = image::image_dimensions(&png)
                .with_context(|| format!("Failed to read atlas image: {}", png.display()))?;
            println!(
                "{} {} ({}x{})",
                "Atlas:".blue().bold(),
                png.display(),
                width,
                height
            );
            Some(width.min(height))
        }
        None => None,
    };
    println!();

    for line in describe(&metadata) {
        println!("  {}", line);
    }

    let Some(side) = side else {
        return Ok(ExitCode::SUCCESS);
    };

    let outside = sprites_outside(&metadata, side);
    println!();
    if outside.is_empty() {
        println!("{} All sprites lie inside the atlas", "ok".green());
        Ok(ExitCode::SUCCESS)
    } else {
        for name in &outside {
            println!("  {} {} extends past the atlas edge", "!!".red(), name);
        }
        Ok(ExitCode::from(1))
    }
}

/// `textures-x.png.json` -> `textures-x.png`
fn atlas_image_path(metadata_path: &Path) -> Option<PathBuf> {
    let name = metadata_path.file_name()?.to_str()?;
    let image_name = name.strip_suffix(".json")?;
    Some(metadata_path.with_file_name(image_name))
}

/// One line per sprite, in sorted name order.
pub fn describe(metadata: &AtlasMetadata) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, shape) in metadata.iter() {
        match shape {
            ShapeMetadata::Icon(r) => lines.push(format!(
                "{} icon {}x{} at ({}, {})",
                name, r.width, r.height, r.x, r.y
            )),
            ShapeMetadata::Cube(faces) => {
                lines.push(format!("{} cube", name));
                for (face, r) in faces.iter() {
                    lines.push(format!(
                        "    {} {}x{} at ({}, {})",
                        face, r.width, r.height, r.x, r.y
                    ));
                }
            }
        }
    }
    lines
}

/// Names of sprites with any rectangle outside a `side`×`side` atlas.
pub fn sprites_outside(metadata: &AtlasMetadata, side: u32) -> Vec<String> {
    metadata
        .iter()
        .filter(|(_, shape)| shape.rects().iter().any(|r| !r.fits_within(side)))
        .map(|(name, _)| name.to_string())
        .collect()
}
