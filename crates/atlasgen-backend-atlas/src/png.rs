//! Deterministic PNG writer for atlas canvases.
//!
//! Uses fixed compression settings so the same canvas always encodes to the
//! same bytes.

use std::io::Write;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::builder::Canvas;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write a canvas as RGBA8 PNG to any writer.
pub fn write_canvas_to_writer<W: Write>(
    canvas: &Canvas,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, canvas.side(), canvas.side());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(canvas.pixels())?;

    Ok(())
}

/// BLAKE3 hash of encoded PNG bytes, as lowercase hex.
pub fn hash_png(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Encode to memory and return the bytes with their hash.
pub fn write_canvas_to_vec_with_hash(
    canvas: &Canvas,
    config: &PngConfig,
) -> Result<(Vec<u8>, String), PngError> {
    let mut data = Vec::new();
    write_canvas_to_writer(canvas, &mut data, config)?;
    let hash = hash_png(&data);
    Ok((data, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::AtlasBuilder;
    use crate::raster::RasterImage;

    fn two_sprite_canvas() -> Canvas {
        let mut builder = AtlasBuilder::square(4).unwrap();
        builder
            .put(&RasterImage::filled(4, 4, [255, 0, 0, 255]).unwrap())
            .unwrap();
        builder
            .put(&RasterImage::filled(4, 4, [0, 0, 255, 128]).unwrap())
            .unwrap();
        builder.finalize().1
    }

    #[test]
    fn test_png_signature_and_determinism() {
        let canvas = two_sprite_canvas();
        let config = PngConfig::default();

        let (a, hash_a) = write_canvas_to_vec_with_hash(&canvas, &config).unwrap();
        let (b, hash_b) = write_canvas_to_vec_with_hash(&canvas, &config).unwrap();

        assert_eq!(&a[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        assert_eq!(a, b);
        assert_eq!(hash_a, hash_b);
        assert_eq!(hash_a.len(), 64);
    }

    #[test]
    fn test_png_roundtrip_pixels() {
        let canvas = two_sprite_canvas();
        let (data, _) = write_canvas_to_vec_with_hash(&canvas, &PngConfig::default()).unwrap();

        let decoder = png::Decoder::new(std::io::Cursor::new(data));
        let mut reader = decoder.read_info().unwrap();
        let mut pixels = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut pixels).unwrap();

        assert_eq!((info.width, info.height), (8, 8));
        assert_eq!(&pixels[..info.buffer_size()], canvas.pixels());
    }
}
