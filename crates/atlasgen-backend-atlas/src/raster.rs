//! Raster images and the source that produces them.

use std::path::Path;

use crate::error::{AtlasError, AtlasResult};

/// Channels per pixel (RGBA).
pub const CHANNELS: usize = 4;

/// An immutable RGBA8 pixel buffer, row-major.
///
/// Equality is exact pixel equality, which is what atlas deduplication uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer, checking its length against the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> AtlasResult<Self> {
        if width == 0 || height == 0 {
            return Err(AtlasError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(AtlasError::InvalidImage {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// An image where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> AtlasResult<Self> {
        let count = width as usize * height as usize;
        let pixels = rgba.repeat(count);
        Self::from_rgba(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        let p = &self.pixels[i..i + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Produces square RGBA images from source files.
///
/// Implementations must be deterministic for identical file content and size.
/// The atlas engine depends only on this trait; the process-backed SVG
/// rasterizer and its cache live in `atlasgen-backend-svg`, and tests use
/// in-memory doubles.
pub trait RasterSource {
    /// Error produced when a file cannot be rasterized.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Rasterize `path` to a `size`×`size` image.
    fn rasterize(&mut self, path: &Path, size: u32) -> Result<RasterImage, Self::Error>;
}

impl<S: RasterSource + ?Sized> RasterSource for &mut S {
    type Error = S::Error;

    fn rasterize(&mut self, path: &Path, size: u32) -> Result<RasterImage, Self::Error> {
        (**self).rasterize(path, size)
    }
}
