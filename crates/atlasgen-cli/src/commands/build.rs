//! Build command implementation
//!
//! Rasterizes every sprite in the input directory once per size class and
//! writes one atlas image plus its sidecar metadata per class.

use anyhow::{Context, Result};
use atlasgen_backend_atlas::png::{write_canvas_to_vec_with_hash, PngConfig};
use atlasgen_backend_atlas::{RasterSource, SpriteIndex};
use atlasgen_backend_svg::{ExporterConfig, RasterCache, SvgExporter};
use atlasgen_spec::{validate_size_classes, GenerationError, SizeClass};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use crate::scan::{scan_input, Asset};
use crate::timer::Timer;

/// Default input directory.
pub const DEFAULT_INPUT_DIR: &str = ".";

/// Default output directory.
pub const DEFAULT_OUT_DIR: &str = "../gen";

/// Options shared by every size class of one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory scanned for icons and cubes.
    pub input_dir: PathBuf,
    /// Directory receiving `textures-<name>.png` and its `.json` sidecar.
    pub out_dir: PathBuf,
    /// Size classes, built in order.
    pub size_classes: Vec<SizeClass>,
    /// Suppress timer output.
    pub quiet: bool,
}

impl BuildOptions {
    pub fn new(input_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            out_dir: out_dir.into(),
            size_classes: SizeClass::defaults(),
            quiet: false,
        }
    }

    pub fn size_classes(mut self, classes: Vec<SizeClass>) -> Self {
        self.size_classes = classes;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

/// Outcome of building one size class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeClassResult {
    /// Size class name
    pub name: String,
    /// Sprite side length in pixels
    pub size: u32,
    /// Whether the atlas and metadata were written
    pub success: bool,
    /// Number of named sprites
    pub sprites: usize,
    /// Distinct images after deduplication
    pub unique_images: usize,
    /// Side of the atlas canvas in pixels
    pub canvas_side: Option<u32>,
    /// BLAKE3 hash of the written PNG
    pub png_hash: Option<String>,
    /// Path of the written PNG
    pub image_path: Option<String>,
    /// Path of the written metadata
    pub metadata_path: Option<String>,
    /// Build time in milliseconds
    pub duration_ms: u64,
    /// Error message if failed
    pub error: Option<String>,
}

/// Rasterization cache statistics for a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Summary report for a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSummary {
    /// RFC 3339 timestamp of the build
    pub timestamp: String,
    /// Input directory
    pub input_dir: String,
    /// Output directory
    pub out_dir: String,
    /// Assets found in the input directory
    pub assets: usize,
    /// Size classes built successfully
    pub successful: usize,
    /// Size classes that failed
    pub failed: usize,
    /// Total runtime in seconds
    pub runtime_seconds: f64,
    /// Rasterization cache statistics, when a cache was used
    pub cache: Option<CacheStats>,
    /// Results for each size class, in build order
    pub classes: Vec<SizeClassResult>,
}

impl BuildSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// What a successful size class produced.
struct ClassOutput {
    sprites: usize,
    unique_images: usize,
    canvas_side: u32,
    png_hash: String,
    image_path: PathBuf,
    metadata_path: PathBuf,
}

/// Run the build command
///
/// # Arguments
/// * `options` - Directories, size classes and verbosity
/// * `exporter` - svgexport configuration
/// * `report` - Optional path for a JSON build summary
///
/// # Returns
/// Exit code: 0 success, 1 if any size class failed
pub fn run(
    options: &BuildOptions,
    exporter: ExporterConfig,
    report: Option<&Path>,
) -> Result<ExitCode> {
    validate_size_classes(&options.size_classes)?;

    println!("{}", "======================================".cyan());
    println!("{}", "  atlasgen Atlas Builder".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!(
        "{} {}",
        "Input directory:".blue().bold(),
        options.input_dir.display()
    );
    println!(
        "{} {}",
        "Output directory:".blue().bold(),
        options.out_dir.display()
    );
    println!(
        "{} {}",
        "Size classes:".blue().bold(),
        options
            .size_classes
            .iter()
            .map(|c| format!("{}={}", c.name, c.size))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let mut cache = RasterCache::new(SvgExporter::with_config(exporter));
    let mut summary = build_all(options, &mut cache)?;
    summary.cache = Some(CacheStats {
        hits: cache.hits(),
        misses: cache.misses(),
    });

    print_summary(&summary);

    if let Some(path) = report {
        write_report(&summary, path)?;
        println!("{} {}", "Build report:".blue().bold(), path.display());
    }

    if summary.has_failures() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Build every size class in `options` using `source` to rasterize sprites.
///
/// A failing size class is recorded in the summary and the remaining classes
/// still run. Only failures to read the input or create the output directory
/// abort the whole build.
pub fn build_all<S: RasterSource>(options: &BuildOptions, source: &mut S) -> Result<BuildSummary> {
    let start = Instant::now();

    let assets = scan_input(&options.input_dir)?;
    fs::create_dir_all(&options.out_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.out_dir.display()
        )
    })?;

    println!(
        "{} Found {} sprites ({} icons, {} cubes)",
        "INFO".blue().bold(),
        assets.len(),
        assets.iter().filter(|a| matches!(a, Asset::Icon(_))).count(),
        assets.iter().filter(|a| matches!(a, Asset::Cube(_))).count()
    );

    let timer = if options.quiet {
        Timer::silent("build")
    } else {
        Timer::root("build")
    };

    let mut classes = Vec::with_capacity(options.size_classes.len());
    for class in &options.size_classes {
        let class_start = Instant::now();
        let class_timer = timer.child(format!("{} ({}px)", class.name, class.size));
        let outcome = build_size_class(&assets, class, &options.out_dir, &mut *source, &class_timer);
        drop(class_timer);

        let duration_ms = class_start.elapsed().as_millis() as u64;
        let result = match outcome {
            Ok(out) => {
                println!(
                    "  {} {} -> {} ({} sprites, {} unique, {}x{})",
                    "ok".green(),
                    class.name,
                    out.image_path.display(),
                    out.sprites,
                    out.unique_images,
                    out.canvas_side,
                    out.canvas_side
                );
                SizeClassResult {
                    name: class.name.clone(),
                    size: class.size,
                    success: true,
                    sprites: out.sprites,
                    unique_images: out.unique_images,
                    canvas_side: Some(out.canvas_side),
                    png_hash: Some(out.png_hash),
                    image_path: Some(out.image_path.to_string_lossy().to_string()),
                    metadata_path: Some(out.metadata_path.to_string_lossy().to_string()),
                    duration_ms,
                    error: None,
                }
            }
            Err(e) => {
                println!("  {} {} - {}", "!!".red(), class.name, e);
                SizeClassResult {
                    name: class.name.clone(),
                    size: class.size,
                    success: false,
                    sprites: 0,
                    unique_images: 0,
                    canvas_side: None,
                    png_hash: None,
                    image_path: None,
                    metadata_path: None,
                    duration_ms,
                    error: Some(e.to_string()),
                }
            }
        };
        classes.push(result);
    }
    drop(timer);

    let successful = classes.iter().filter(|c| c.success).count();
    Ok(BuildSummary {
        timestamp: chrono::Utc::now().to_rfc3339(),
        input_dir: options.input_dir.to_string_lossy().to_string(),
        out_dir: options.out_dir.to_string_lossy().to_string(),
        assets: assets.len(),
        successful,
        failed: classes.len() - successful,
        runtime_seconds: start.elapsed().as_secs_f64(),
        cache: None,
        classes,
    })
}

/// Build one atlas and write it with its metadata.
///
/// Nothing is written unless every sprite was added and encoded.
fn build_size_class<S: RasterSource>(
    assets: &[Asset],
    class: &SizeClass,
    out_dir: &Path,
    source: S,
    timer: &Timer,
) -> Result<ClassOutput, GenerationError> {
    let mut index = SpriteIndex::new(source, class.size).map_err(GenerationError::from_backend)?;

    for asset in assets {
        let _t = timer.child(format!("adding {} {}", asset.kind(), asset.path().display()));
        asset
            .add_to(&mut index)
            .map_err(GenerationError::from_backend)?;
    }

    let sprites = index.len();
    let unique_images = index.unique_images();

    let output = {
        let _t = timer.child("pack");
        index.finalize()
    };

    let _t = timer.child("write");
    let (png_bytes, png_hash) = write_canvas_to_vec_with_hash(&output.canvas, &PngConfig::default())
        .map_err(|e| GenerationError::new("BUILD_001", e.to_string(), "build"))?;
    let metadata_json = output
        .metadata
        .to_json_string()
        .map_err(|e| GenerationError::new("BUILD_002", e.to_string(), "build"))?;

    let image_path = out_dir.join(class.image_file_name());
    let metadata_path = out_dir.join(class.metadata_file_name());
    write_file(&image_path, &png_bytes)?;
    write_file(&metadata_path, metadata_json.as_bytes())?;

    Ok(ClassOutput {
        sprites,
        unique_images,
        canvas_side: output.canvas.side(),
        png_hash,
        image_path,
        metadata_path,
    })
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), GenerationError> {
    fs::write(path, data).map_err(|e| {
        GenerationError::new(
            "BUILD_003",
            format!("Failed to write {}: {}", path.display(), e),
            "build",
        )
    })
}

/// Write the summary as pretty JSON.
pub fn write_report(summary: &BuildSummary, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(summary).context("Failed to serialize build report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}

fn print_summary(summary: &BuildSummary) {
    println!();
    println!("{}", "======================================".cyan());
    println!("{}", "  Build Summary".cyan());
    println!("{}", "======================================".cyan());
    println!();
    println!("{} {}", "Sprites:".blue().bold(), summary.assets);
    println!("{} {}", "Successful:".green().bold(), summary.successful);
    println!("{} {}", "Failed:".red().bold(), summary.failed);
    if let Some(cache) = summary.cache {
        println!(
            "{} {} hits, {} misses",
            "Raster cache:".blue().bold(),
            cache.hits,
            cache.misses
        );
    }
    println!(
        "{} {:.2}s",
        "Total runtime:".blue().bold(),
        summary.runtime_seconds
    );
    println!();

    let with_hashes: Vec<_> = summary
        .classes
        .iter()
        .filter(|c| c.png_hash.is_some())
        .collect();
    if !with_hashes.is_empty() {
        println!("{}", "Atlases with BLAKE3 hashes:".green().bold());
        for class in with_hashes {
            println!(
                "  {}: {}",
                class.name,
                class.png_hash.as_deref().unwrap_or("unknown")
            );
        }
        println!();
    }

    let failed: Vec<_> = summary.classes.iter().filter(|c| !c.success).collect();
    if !failed.is_empty() {
        println!("{}", "Failed size classes:".red().bold());
        for class in failed {
            println!(
                "  - {}: {}",
                class.name,
                class.error.as_deref().unwrap_or("unknown error")
            );
        }
        println!();
    }
}
