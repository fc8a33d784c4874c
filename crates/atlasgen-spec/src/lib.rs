//! atlasgen shared types
//!
//! This crate holds the types every other atlasgen crate agrees on: the
//! sidecar metadata format, sprite shapes, size classes, content hashing, and
//! the [`BackendError`] trait used for error reporting.
//!
//! # Example
//!
//! ```
//! use atlasgen_spec::{AtlasMetadata, Rect, ShapeMetadata};
//!
//! let mut meta = AtlasMetadata::new();
//! meta.insert("coin", ShapeMetadata::Icon(Rect::new(0, 0, 16, 16)));
//!
//! let json = meta.to_json_string().unwrap();
//! assert!(json.contains("\"shape\":\"icon\""));
//! ```
//!
//! # Modules
//!
//! - [`error`]: shared error types and the backend error trait
//! - [`hash`]: BLAKE3 content hashing
//! - [`metadata`]: the sidecar document
//! - [`shape`]: rectangles, cube faces, and per-sprite metadata
//! - [`size_class`]: named atlas sizes

pub mod error;
pub mod hash;
pub mod metadata;
pub mod shape;
pub mod size_class;

pub use error::{BackendError, GenerationError, SpecError};
pub use hash::content_hash;
pub use metadata::AtlasMetadata;
pub use shape::{CubeFace, CubeRects, Rect, ShapeMetadata};
pub use size_class::{validate_size_classes, SizeClass};
