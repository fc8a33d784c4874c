//! atlasgen SVG backend
//!
//! Rasterizes SVG sprites by running [svgexport](https://github.com/shakiba/svgexport)
//! under Node.js, and caches results by file content for the length of one
//! build session.
//!
//! ```no_run
//! use std::path::Path;
//! use atlasgen_backend_svg::{ExporterConfig, RasterCache, SvgExporter};
//! use atlasgen_backend_atlas::RasterSource;
//!
//! let exporter = SvgExporter::with_config(ExporterConfig::default().timeout_secs(30));
//! let mut cache = RasterCache::new(exporter);
//! let image = cache.rasterize(Path::new("assets/coin.svg"), 64).unwrap();
//! assert_eq!(image.width(), 64);
//! ```

pub mod cache;
pub mod error;
pub mod exporter;

pub use cache::RasterCache;
pub use error::{SvgError, SvgResult};
pub use exporter::{
    decode_png, ExporterConfig, SvgExporter, DEFAULT_SVGEXPORT_PATH, DEFAULT_TIMEOUT_SECS,
    NODE_ENV, SVGEXPORT_ENV,
};
