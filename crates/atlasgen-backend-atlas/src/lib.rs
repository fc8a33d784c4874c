//! atlasgen atlas engine
//!
//! This crate packs same-size sprite images into one square, power-of-two
//! texture atlas and reports where every named sprite ended up.
//!
//! # Features
//!
//! - **Exact deduplication**: bit-identical images share one slot
//! - **Growable slot store**: capacity doubles, contents are preserved
//! - **Shelf packing**: deterministic row-by-row placement in insertion order
//! - **Sprite index**: icons and six-faced cubes resolved to pixel rectangles
//! - **Deterministic PNG**: fixed encoder settings for byte-identical output
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use atlasgen_backend_atlas::{RasterImage, RasterSource, SpriteIndex};
//!
//! struct Solid;
//!
//! impl RasterSource for Solid {
//!     type Error = std::io::Error;
//!
//!     fn rasterize(&mut self, _path: &Path, size: u32) -> Result<RasterImage, Self::Error> {
//!         Ok(RasterImage::filled(size, size, [255, 255, 255, 255]).unwrap())
//!     }
//! }
//!
//! let mut index = SpriteIndex::new(Solid, 16).unwrap();
//! index.add_icon(Path::new("coin.svg")).unwrap();
//! let output = index.finalize();
//!
//! assert_eq!(output.canvas.side(), 16);
//! assert!(output.metadata.get("coin").is_some());
//! ```
//!
//! # Determinism
//!
//! The same sequence of add calls with the same images always produces the
//! same placements, canvas bytes and metadata.

pub mod builder;
pub mod error;
pub mod index;
pub mod png;
pub mod raster;
pub mod store;

pub use builder::{
    canvas_side, ceil_sqrt, least_power_of_two_ge, pack_shelves, AtlasBuilder, Canvas, Placement,
    PlacementTable,
};
pub use error::{AtlasError, AtlasResult};
pub use index::{AtlasOutput, SpriteIndex};
pub use png::{PngConfig, PngError};
pub use raster::{RasterImage, RasterSource, CHANNELS};
pub use store::{Slot, SlotStore};
