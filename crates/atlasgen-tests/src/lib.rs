//! atlasgen End-to-End Test Infrastructure
//!
//! Helpers for driving whole builds against temporary asset directories:
//!
//! - [`AssetDir`]: writes icon SVGs and cube directories into a temp dir
//! - [`HashSource`]: a deterministic in-process rasterizer
//! - [`read_png`]: decodes a written atlas for pixel checks
//!
//! ## Running Tests
//!
//! ```bash
//! # Run everything that needs no external tools
//! cargo test -p atlasgen-tests
//!
//! # Also run against a real node + svgexport install
//! ATLASGEN_RUN_SVGEXPORT_TESTS=1 cargo test -p atlasgen-tests -- --ignored
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use atlasgen_backend_atlas::{RasterImage, RasterSource};
use atlasgen_backend_svg::SvgError;
use atlasgen_spec::CubeFace;
use tempfile::TempDir;

/// Check if tests needing node and svgexport should run.
pub fn should_run_svgexport_tests() -> bool {
    std::env::var("ATLASGEN_RUN_SVGEXPORT_TESTS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// A temporary input directory plus a sibling output directory.
pub struct AssetDir {
    root: TempDir,
}

impl AssetDir {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(root.path().join("assets")).expect("Failed to create assets dir");
        Self { root }
    }

    /// Directory holding the sprite sources.
    pub fn input(&self) -> PathBuf {
        self.root.path().join("assets")
    }

    /// Directory the build writes into.
    pub fn output(&self) -> PathBuf {
        self.root.path().join("gen")
    }

    /// Write `<name>.svg` with `body`.
    pub fn icon(self, name: &str, body: &str) -> Self {
        fs::write(self.input().join(format!("{}.svg", name)), body)
            .expect("Failed to write icon");
        self
    }

    /// Write a cube directory whose faces have the given bodies, in
    /// `xp, xn, yp, yn, zp, zn` order.
    pub fn cube(self, name: &str, faces: [&str; 6]) -> Self {
        let dir = self.input().join(name);
        fs::create_dir_all(&dir).expect("Failed to create cube dir");
        for face in CubeFace::ALL {
            fs::write(dir.join(face.file_name()), faces[face.index()])
                .expect("Failed to write cube face");
        }
        self
    }

    /// Write an arbitrary file into the input directory.
    pub fn file(self, name: &str, body: &str) -> Self {
        fs::write(self.input().join(name), body).expect("Failed to write file");
        self
    }
}

impl Default for AssetDir {
    fn default() -> Self {
        Self::new()
    }
}

/// The fill color [`HashSource`] uses for a file with these bytes.
pub fn color_for(bytes: &[u8]) -> [u8; 4] {
    let hash = blake3::hash(bytes);
    let h = hash.as_bytes();
    [h[0], h[1], h[2], 255]
}

/// Fills each sprite with a color derived from the file's BLAKE3 hash.
///
/// Identical files give identical images, so deduplication is observable.
#[derive(Debug, Default)]
pub struct HashSource {
    /// Number of rasterize calls served.
    pub calls: usize,
}

impl RasterSource for HashSource {
    type Error = SvgError;

    fn rasterize(&mut self, path: &Path, size: u32) -> Result<RasterImage, SvgError> {
        self.calls += 1;
        let bytes = fs::read(path).map_err(|e| SvgError::ReadSource {
            path: path.to_path_buf(),
            source: e,
        })?;
        RasterImage::filled(size, size, color_for(&bytes)).map_err(|e| {
            SvgError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

/// A decoded RGBA8 PNG.
pub struct DecodedPng {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedPng {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// Decode an RGBA8 PNG file.
pub fn read_png(path: &Path) -> DecodedPng {
    let file = fs::File::open(path).expect("Failed to open PNG");
    let decoder = png::Decoder::new(std::io::BufReader::new(file));
    let mut reader = decoder.read_info().expect("Failed to read PNG header");
    let mut pixels = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut pixels).expect("Failed to decode PNG");
    assert_eq!(info.color_type, png::ColorType::Rgba, "atlas must be RGBA");
    pixels.truncate(info.buffer_size());

    DecodedPng {
        width: info.width,
        height: info.height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_source_is_deterministic() {
        let dir = AssetDir::new().icon("a", "<svg/>").icon("b", "<svg/>");
        let mut source = HashSource::default();
        let a = source.rasterize(&dir.input().join("a.svg"), 4).unwrap();
        let b = source.rasterize(&dir.input().join("b.svg"), 4).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.pixel(0, 0), Some(color_for(b"<svg/>")));
        assert_eq!(source.calls, 2);
    }

    #[test]
    fn test_missing_file() {
        let mut source = HashSource::default();
        let err = source.rasterize(Path::new("nope.svg"), 4).unwrap_err();
        assert!(matches!(err, SvgError::ReadSource { .. }));
    }
}
