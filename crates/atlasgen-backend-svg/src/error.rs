//! Error types for the SVG backend.

use atlasgen_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for SVG backend operations.
pub type SvgResult<T> = Result<T, SvgError>;

/// Errors that can occur while rasterizing an SVG.
#[derive(Debug, Error)]
pub enum SvgError {
    /// The SVG file does not exist.
    #[error("SVG source not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Node executable not found.
    #[error("node executable not found. Ensure Node.js is installed and in PATH, or set ATLASGEN_NODE environment variable")]
    NodeNotFound,

    /// svgexport script not found.
    #[error("svgexport not found at {path}. Run `npm install svgexport` or set ATLASGEN_SVGEXPORT environment variable")]
    SvgexportNotFound { path: PathBuf },

    /// Failed to spawn the rasterizer process.
    #[error("Failed to spawn svgexport process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The rasterizer did not finish in time.
    #[error("svgexport timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The rasterizer exited with non-zero status.
    #[error("svgexport exited with status {exit_code}: {stderr}")]
    ProcessFailed { exit_code: i32, stderr: String },

    /// The rasterizer's output could not be decoded as PNG.
    #[error("Failed to decode rasterized PNG for {path}: {source}")]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The rasterizer produced an image of the wrong size.
    #[error("svgexport produced {actual_width}x{actual_height} for {path}, expected {expected}x{expected}")]
    UnexpectedDimensions {
        path: PathBuf,
        expected: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The SVG file could not be read.
    #[error("Failed to read SVG source {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error while managing scratch files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SvgError {
    /// Creates a new process failed error.
    pub fn process_failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self::ProcessFailed {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

impl BackendError for SvgError {
    fn code(&self) -> &'static str {
        match self {
            SvgError::SourceNotFound { .. } => "SVG_001",
            SvgError::NodeNotFound => "SVG_002",
            SvgError::SvgexportNotFound { .. } => "SVG_003",
            SvgError::SpawnFailed(_) => "SVG_004",
            SvgError::Timeout { .. } => "SVG_005",
            SvgError::ProcessFailed { .. } => "SVG_006",
            SvgError::DecodeFailed { .. } => "SVG_007",
            SvgError::UnexpectedDimensions { .. } => "SVG_008",
            SvgError::ReadSource { .. } => "SVG_009",
            SvgError::Io(_) => "SVG_010",
        }
    }

    fn category(&self) -> &'static str {
        "svg"
    }
}
