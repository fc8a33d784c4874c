//! Named sprites on top of an [`AtlasBuilder`].
//!
//! A [`SpriteIndex`] turns "add this icon" and "add this cube" requests into
//! builder insertions, remembers which slots each sprite uses, and after
//! packing resolves those slots into the rectangles written to the sidecar.

use std::collections::HashSet;
use std::path::Path;

use atlasgen_spec::{AtlasMetadata, CubeFace, CubeRects, Rect, ShapeMetadata};

use crate::builder::{AtlasBuilder, Canvas, PlacementTable};
use crate::error::{AtlasError, AtlasResult};
use crate::raster::RasterSource;
use crate::store::Slot;

#[derive(Debug, Clone)]
enum ShapeEntry {
    Icon { slot: Slot },
    Cube { faces: [Slot; 6] },
}

/// Everything produced by finalizing one size class.
#[derive(Debug, Clone)]
pub struct AtlasOutput {
    /// Sprite name to resolved rectangles.
    pub metadata: AtlasMetadata,
    /// The composited atlas image.
    pub canvas: Canvas,
    /// Raw slot placements, before any per-shape axis handling.
    pub placements: PlacementTable,
}

/// Sprite index for one size class.
///
/// Consumed by [`SpriteIndex::finalize`]; no sprites can be added afterwards.
pub struct SpriteIndex<S: RasterSource> {
    source: S,
    size: u32,
    builder: AtlasBuilder,
    entries: Vec<(String, ShapeEntry)>,
    names: HashSet<String>,
}

impl<S: RasterSource> SpriteIndex<S> {
    /// Create an index whose sprites are rasterized at `size`×`size`.
    pub fn new(source: S, size: u32) -> AtlasResult<Self> {
        Ok(Self {
            source,
            size,
            builder: AtlasBuilder::square(size)?,
            entries: Vec::new(),
            names: HashSet::new(),
        })
    }

    /// Sprite side length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of sprites added.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct images stored after deduplication.
    pub fn unique_images(&self) -> usize {
        self.builder.count()
    }

    /// Add an icon named after the file, without its extension.
    pub fn add_icon(&mut self, path: &Path) -> AtlasResult<()> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AtlasError::InvalidName(path.to_path_buf()))?
            .to_string();
        self.add_icon_named(name, path)
    }

    /// Add an icon under an explicit name.
    pub fn add_icon_named(&mut self, name: impl Into<String>, path: &Path) -> AtlasResult<()> {
        let name = self.claim_name(name.into())?;
        let slot = self.insert(path)?;
        self.record(name, ShapeEntry::Icon { slot });
        Ok(())
    }

    /// Add a cube from `<directory>/{xp,xn,yp,yn,zp,zn}.svg`, named after the directory.
    pub fn add_cube(&mut self, directory: &Path) -> AtlasResult<()> {
        let name = directory
            .file_name()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AtlasError::InvalidName(directory.to_path_buf()))?
            .to_string();
        self.add_cube_named(name, directory)
    }

    /// Add a cube under an explicit name.
    ///
    /// If any face fails, slots stored for earlier faces are released and the
    /// index is left as it was before the call.
    pub fn add_cube_named(&mut self, name: impl Into<String>, directory: &Path) -> AtlasResult<()> {
        let name = self.claim_name(name.into())?;

        let before = self.builder.count();
        let mut faces = [Slot::new(0); 6];
        for face in CubeFace::ALL {
            match self.insert(&directory.join(face.file_name())) {
                Ok(slot) => faces[face.index()] = slot,
                Err(e) => {
                    // Slots from `before` on were created by this call only
                    self.builder.truncate(before);
                    return Err(e);
                }
            }
        }

        self.record(name, ShapeEntry::Cube { faces });
        Ok(())
    }

    /// Pack the atlas and resolve every sprite's rectangles.
    ///
    /// Cube faces take their `x` from the placement's row and their `y` from
    /// its column; icons use the placement as is. Renderers sampling cube
    /// faces depend on the swapped axes.
    pub fn finalize(self) -> AtlasOutput {
        let (placements, canvas) = self.builder.finalize();
        let size = self.size;

        let metadata = self
            .entries
            .into_iter()
            .map(|(name, entry)| {
                let shape = match entry {
                    ShapeEntry::Icon { slot } => {
                        let p = placements[slot];
                        ShapeMetadata::Icon(Rect::new(p.x, p.y, size, size))
                    }
                    ShapeEntry::Cube { faces } => {
                        ShapeMetadata::Cube(CubeRects::from_fn(|face| {
                            let p = placements[faces[face.index()]];
                            Rect::new(p.y, p.x, size, size)
                        }))
                    }
                };
                (name, shape)
            })
            .collect();

        AtlasOutput {
            metadata,
            canvas,
            placements,
        }
    }

    fn claim_name(&self, name: String) -> AtlasResult<String> {
        if self.names.contains(&name) {
            return Err(AtlasError::DuplicateSprite(name));
        }
        Ok(name)
    }

    fn record(&mut self, name: String, entry: ShapeEntry) {
        self.names.insert(name.clone());
        self.entries.push((name, entry));
    }

    fn insert(&mut self, path: &Path) -> AtlasResult<Slot> {
        let image = self
            .source
            .rasterize(path, self.size)
            .map_err(|e| AtlasError::raster(path, e))?;
        self.builder.put(&image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterImage;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Serves fixed images by path.
    #[derive(Default)]
    struct FixedSource {
        images: HashMap<PathBuf, RasterImage>,
        calls: usize,
    }

    impl FixedSource {
        fn with(mut self, path: &str, value: u8, size: u32) -> Self {
            let image = RasterImage::filled(size, size, [value, 0, 0, 255]).unwrap();
            self.images.insert(PathBuf::from(path), image);
            self
        }
    }

    impl RasterSource for FixedSource {
        type Error = std::io::Error;

        fn rasterize(&mut self, path: &Path, _size: u32) -> Result<RasterImage, Self::Error> {
            self.calls += 1;
            self.images.get(path).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
            })
        }
    }

    fn cube_source(dir: &str, size: u32, base: u8) -> FixedSource {
        CubeFace::ALL
            .iter()
            .fold(FixedSource::default(), |src, face| {
                let path = format!("{}/{}", dir, face.file_name());
                src.with(&path, base + face.index() as u8, size)
            })
    }

    #[test]
    fn test_icon_named_after_file_stem() {
        let source = FixedSource::default().with("icons/coin.svg", 1, 16);
        let mut index = SpriteIndex::new(source, 16).unwrap();
        index.add_icon(Path::new("icons/coin.svg")).unwrap();

        let output = index.finalize();
        assert_eq!(
            output.metadata.get("coin"),
            Some(&ShapeMetadata::Icon(Rect::new(0, 0, 16, 16)))
        );
        assert_eq!(output.canvas.side(), 16);
    }

    #[test]
    fn test_icons_are_not_swapped() {
        let source = FixedSource::default()
            .with("a.svg", 1, 16)
            .with("b.svg", 2, 16)
            .with("c.svg", 3, 16);
        let mut index = SpriteIndex::new(source, 16).unwrap();
        for path in ["a.svg", "b.svg", "c.svg"] {
            index.add_icon(Path::new(path)).unwrap();
        }

        let output = index.finalize();
        assert_eq!(
            output.metadata.get("b"),
            Some(&ShapeMetadata::Icon(Rect::new(16, 0, 16, 16)))
        );
        assert_eq!(
            output.metadata.get("c"),
            Some(&ShapeMetadata::Icon(Rect::new(0, 16, 16, 16)))
        );
    }

    #[test]
    fn test_cube_faces_are_swapped() {
        let source = cube_source("skybox", 64, 10);
        let mut index = SpriteIndex::new(source, 64).unwrap();
        index.add_cube(Path::new("skybox")).unwrap();
        assert_eq!(index.unique_images(), 6);

        let output = index.finalize();
        assert_eq!(output.canvas.side(), 256);

        let ShapeMetadata::Cube(faces) = output.metadata.get("skybox").copied().unwrap() else {
            panic!("skybox should be a cube");
        };
        for (face, rect) in faces.iter() {
            let raw = output.placements.rect(Slot::new(face.index())).unwrap();
            assert_eq!((rect.x, rect.y), (raw.y, raw.x), "face {}", face);
            assert_eq!((rect.width, rect.height), (64, 64));
        }
        // Third face sits at column 128, row 0 in the canvas
        assert_eq!(faces.yp, Rect::new(0, 128, 64, 64));
    }

    #[test]
    fn test_identical_faces_share_a_slot() {
        let source = CubeFace::ALL.iter().fold(FixedSource::default(), |src, face| {
            src.with(&format!("dice/{}", face.file_name()), 5, 16)
        });
        let mut index = SpriteIndex::new(source, 16).unwrap();
        index.add_cube(Path::new("dice")).unwrap();
        assert_eq!(index.unique_images(), 1);

        let output = index.finalize();
        let meta = output.metadata.get("dice").unwrap();
        for rect in meta.rects() {
            assert_eq!(rect, Rect::new(0, 0, 16, 16));
        }
    }

    #[test]
    fn test_duplicate_name_rejected_before_rasterizing() {
        let source = FixedSource::default().with("coin.svg", 1, 16);
        let mut index = SpriteIndex::new(source, 16).unwrap();
        index.add_icon(Path::new("coin.svg")).unwrap();

        let err = index.add_icon(Path::new("coin.svg")).unwrap_err();
        assert!(matches!(err, AtlasError::DuplicateSprite(name) if name == "coin"));
        assert_eq!(index.source.calls, 1);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_source_is_raster_error() {
        let mut index = SpriteIndex::new(FixedSource::default(), 16).unwrap();
        let err = index.add_icon(Path::new("missing.svg")).unwrap_err();
        assert!(matches!(err, AtlasError::Raster { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn test_failed_cube_leaves_no_slots() {
        let mut source = cube_source("crate", 16, 20).with("coin.svg", 1, 16);
        source.images.remove(Path::new("crate/yn.svg"));
        let mut index = SpriteIndex::new(source, 16).unwrap();
        index.add_icon(Path::new("coin.svg")).unwrap();

        let err = index.add_cube(Path::new("crate")).unwrap_err();
        assert!(matches!(err, AtlasError::Raster { .. }));
        assert_eq!(index.unique_images(), 1);
        assert_eq!(index.len(), 1);

        let output = index.finalize();
        assert_eq!(output.placements.len(), 1);
        assert_eq!(output.canvas.side(), 16);
        assert!(output.metadata.get("crate").is_none());
    }

    #[test]
    fn test_wrong_size_from_source() {
        let source = FixedSource::default().with("big.svg", 1, 32);
        let mut index = SpriteIndex::new(source, 16).unwrap();
        let err = index.add_icon(Path::new("big.svg")).unwrap_err();
        assert!(matches!(err, AtlasError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_empty_index() {
        let index = SpriteIndex::new(FixedSource::default(), 16).unwrap();
        let output = index.finalize();
        assert!(output.metadata.is_empty());
        assert_eq!(output.canvas.side(), 1);
        assert!(output.placements.is_empty());
    }

    #[test]
    fn test_explicit_names() {
        let source = FixedSource::default().with("x.svg", 1, 8);
        let mut index = SpriteIndex::new(source, 8).unwrap();
        index.add_icon_named("gem", Path::new("x.svg")).unwrap();
        let output = index.finalize();
        assert!(output.metadata.get("gem").is_some());
        assert!(output.metadata.get("x").is_none());
    }
}
