//! Error types for the atlas backend.

use atlasgen_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for atlas backend operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors that can occur while building an atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// A pixel buffer's length does not match its declared dimensions.
    #[error("Invalid image: {width}x{height} RGBA needs {expected} bytes, got {actual}")]
    InvalidImage {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Atlas images must have non-zero width and height.
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// An image does not match the size every slot in this atlas shares.
    #[error("Image is {actual_width}x{actual_height} but this atlas stores {expected_width}x{expected_height} images")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// Slot bookkeeping is corrupt: more slots are in use than exist.
    ///
    /// Never caused by input; the build must be aborted.
    #[error("Slot store invariant violated: count {count} exceeds capacity {capacity}")]
    SlotOverflow { count: usize, capacity: usize },

    /// The raster source failed to produce an image.
    #[error("Failed to rasterize {path}: {source}")]
    Raster {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A sprite with this name was already added.
    #[error("Duplicate sprite name: '{0}'")]
    DuplicateSprite(String),

    /// No sprite name could be derived from the path.
    #[error("Cannot derive a sprite name from path: {0}")]
    InvalidName(PathBuf),
}

impl AtlasError {
    /// Creates a new raster error for `path`.
    pub fn raster(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Raster {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

impl BackendError for AtlasError {
    fn code(&self) -> &'static str {
        match self {
            AtlasError::InvalidImage { .. } => "ATLAS_001",
            AtlasError::ZeroDimensions { .. } => "ATLAS_002",
            AtlasError::DimensionMismatch { .. } => "ATLAS_003",
            AtlasError::SlotOverflow { .. } => "ATLAS_004",
            AtlasError::Raster { .. } => "ATLAS_005",
            AtlasError::DuplicateSprite(_) => "ATLAS_006",
            AtlasError::InvalidName(_) => "ATLAS_007",
        }
    }

    fn category(&self) -> &'static str {
        "atlas"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AtlasError::SlotOverflow {
            count: 5,
            capacity: 4,
        };
        assert!(err.to_string().contains("count 5 exceeds capacity 4"));
        assert_eq!(err.code(), "ATLAS_004");
        assert_eq!(err.category(), "atlas");

        let err = AtlasError::DimensionMismatch {
            expected_width: 16,
            expected_height: 16,
            actual_width: 32,
            actual_height: 32,
        };
        assert!(err.to_string().contains("32x32"));
    }

    #[test]
    fn test_raster_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AtlasError::raster("icons/coin.svg", io);
        assert!(err.to_string().contains("icons/coin.svg"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
