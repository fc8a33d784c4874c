//! Content-addressed rasterization cache.
//!
//! Keys are the BLAKE3 hash of the SVG file's bytes plus the requested size,
//! so byte-identical files at different paths are rasterized once. The cache
//! lives for one build session and is never persisted.

use std::collections::HashMap;
use std::path::Path;

use atlasgen_backend_atlas::{RasterImage, RasterSource};
use atlasgen_spec::content_hash;

use crate::error::SvgError;

/// Memoizing wrapper around another raster source.
#[derive(Debug)]
pub struct RasterCache<R> {
    inner: R,
    entries: HashMap<(String, u32), RasterImage>,
    hits: usize,
    misses: usize,
}

impl<R> RasterCache<R>
where
    R: RasterSource<Error = SvgError>,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to run the inner source.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R> RasterSource for RasterCache<R>
where
    R: RasterSource<Error = SvgError>,
{
    type Error = SvgError;

    fn rasterize(&mut self, path: &Path, size: u32) -> Result<RasterImage, SvgError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SvgError::SourceNotFound {
                path: path.to_path_buf(),
            },
            _ => SvgError::ReadSource {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        let key = (content_hash(&bytes), size);

        if let Some(image) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(image.clone());
        }

        let image = self.inner.rasterize(path, size)?;
        self.misses += 1;
        self.entries.insert(key, image.clone());
        Ok(image)
    }
}
