//! Input directory classification.
//!
//! Only the top level of the input directory is examined. A subdirectory
//! holding an `xp.svg` is a cube; a file ending in `.svg` is an icon;
//! everything else is ignored.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atlasgen_backend_atlas::{RasterSource, SpriteIndex};
use atlasgen_spec::CubeFace;
use walkdir::WalkDir;

/// One sprite source found in the input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    /// A single SVG file.
    Icon(PathBuf),
    /// A directory of six face SVGs.
    Cube(PathBuf),
}

impl Asset {
    pub fn path(&self) -> &Path {
        match self {
            Asset::Icon(path) | Asset::Cube(path) => path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Asset::Icon(_) => "icon",
            Asset::Cube(_) => "cube",
        }
    }

    /// Add this asset to `index`.
    pub fn add_to<S: RasterSource>(
        &self,
        index: &mut SpriteIndex<S>,
    ) -> atlasgen_backend_atlas::AtlasResult<()> {
        match self {
            Asset::Icon(path) => index.add_icon(path),
            Asset::Cube(dir) => index.add_cube(dir),
        }
    }
}

/// List the assets directly inside `dir`, sorted by file name.
pub fn scan_input(dir: &Path) -> Result<Vec<Asset>> {
    if !dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", dir.display());
    }

    let cube_marker = CubeFace::Xp.file_name();
    let mut assets = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to list input directory: {}", dir.display()))?;
        let path = entry.path();

        // Resolves symlinks, unlike the entry's own file type
        if path.is_dir() {
            if path.join(&cube_marker).is_file() {
                assets.push(Asset::Cube(path.to_path_buf()));
            }
        } else if entry.file_name().to_string_lossy().ends_with(".svg") {
            assets.push(Asset::Icon(path.to_path_buf()));
        }
    }

    Ok(assets)
}
