//! svgexport subprocess runner.
//!
//! Each rasterization spawns `node <svgexport> <source> <out.png> <size>:<size>`
//! inside a scratch directory, waits for it with a timeout, then decodes the
//! PNG it wrote.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use atlasgen_backend_atlas::{RasterImage, RasterSource};
use image::ImageFormat;

use crate::error::{SvgError, SvgResult};

/// Default timeout for one svgexport run (2 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default location of the svgexport script, relative to the working directory.
pub const DEFAULT_SVGEXPORT_PATH: &str = "node_modules/.bin/svgexport";

/// Environment variable overriding the node executable.
pub const NODE_ENV: &str = "ATLASGEN_NODE";

/// Environment variable overriding the svgexport script.
pub const SVGEXPORT_ENV: &str = "ATLASGEN_SVGEXPORT";

/// Configuration for the SVG exporter.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Path or name of the node executable.
    pub node_path: Option<PathBuf>,
    /// Path to the svgexport script.
    pub svgexport_path: PathBuf,
    /// Timeout for one rasterization.
    pub timeout: Duration,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            node_path: None,
            svgexport_path: PathBuf::from(DEFAULT_SVGEXPORT_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ExporterConfig {
    /// Sets the node executable.
    pub fn node_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.node_path = Some(path.into());
        self
    }

    /// Sets the svgexport script path.
    pub fn svgexport_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.svgexport_path = path.into();
        self
    }

    /// Sets the timeout duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Rasterizes SVG files by running svgexport under node.
#[derive(Debug, Clone, Default)]
pub struct SvgExporter {
    config: ExporterConfig,
}

impl SvgExporter {
    /// Creates an exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an exporter with the given configuration.
    pub fn with_config(config: ExporterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Finds the node executable.
    pub fn resolve_node(&self) -> SvgResult<PathBuf> {
        // Config override first; bare names are looked up in PATH
        if let Some(ref path) = self.config.node_path {
            if path.exists() {
                return Ok(path.clone());
            }
            if let Ok(found) = which::which(path) {
                return Ok(found);
            }
        }

        if let Ok(path) = std::env::var(NODE_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        which::which("node").map_err(|_| SvgError::NodeNotFound)
    }

    /// Finds the svgexport script.
    pub fn resolve_svgexport(&self) -> SvgResult<PathBuf> {
        if self.config.svgexport_path.exists() {
            return Ok(self.config.svgexport_path.clone());
        }

        if let Ok(path) = std::env::var(SVGEXPORT_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
            return Err(SvgError::SvgexportNotFound { path });
        }

        Err(SvgError::SvgexportNotFound {
            path: self.config.svgexport_path.clone(),
        })
    }

    /// Rasterizes `source` to a `size`×`size` RGBA image.
    pub fn export(&self, source: &Path, size: u32) -> SvgResult<RasterImage> {
        if !source.is_file() {
            return Err(SvgError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        let node = self.resolve_node()?;
        let svgexport = self.resolve_svgexport()?;

        let temp_dir = tempfile::tempdir()?;
        let out_path = temp_dir.path().join("out.png");

        // node <svgexport> <source> <out.png> <size>:<size>
        let mut cmd = Command::new(&node);
        cmd.arg(&svgexport)
            .arg(source)
            .arg(&out_path)
            .arg(format!("{}:{}", size, size))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(SvgError::SpawnFailed)?;
        let (status, stderr) = wait_with_timeout(child, self.config.timeout)?;

        if !status.success() {
            let exit_code = status.code().unwrap_or(-1);
            return Err(SvgError::process_failed(exit_code, stderr.trim()));
        }

        let bytes = std::fs::read(&out_path)?;
        decode_png(source, &bytes, size)
    }
}

impl RasterSource for SvgExporter {
    type Error = SvgError;

    fn rasterize(&mut self, path: &Path, size: u32) -> Result<RasterImage, Self::Error> {
        self.export(path, size)
    }
}

/// Decode PNG bytes to RGBA8 and check they are `size`×`size`.
pub fn decode_png(source: &Path, bytes: &[u8], size: u32) -> SvgResult<RasterImage> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|e| SvgError::DecodeFailed {
            path: source.to_path_buf(),
            source: e,
        })?
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    if width != size || height != size {
        return Err(SvgError::UnexpectedDimensions {
            path: source.to_path_buf(),
            expected: size,
            actual_width: width,
            actual_height: height,
        });
    }

    RasterImage::from_rgba(width, height, decoded.into_raw()).map_err(|_| {
        SvgError::UnexpectedDimensions {
            path: source.to_path_buf(),
            expected: size,
            actual_width: width,
            actual_height: height,
        }
    })
}

/// Wait for `child`, killing it once `timeout` has passed.
///
/// Returns the exit status and whatever the child wrote to its piped stderr.
/// Stderr is drained on a reader thread so a chatty child never blocks on a
/// full pipe.
pub(crate) fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> SvgResult<(ExitStatus, String)> {
    let start = Instant::now();

    let reader = child.stderr.take().map(|mut err| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            buf
        })
    });

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SvgError::Timeout {
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(SvgError::SpawnFailed(e)),
        }
    };

    let stderr = reader
        .and_then(|handle| handle.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default();

    Ok((status, stderr))
}
