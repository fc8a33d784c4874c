//! Deduplicating atlas builder with deterministic shelf packing.
//!
//! Every image in one builder has the same dimensions (one builder serves one
//! size class). Images are stored once per distinct pixel content; at
//! finalize time the distinct images are packed row by row, in insertion
//! order, into the smallest power-of-two square that holds them.
//!
//! Deduplication compares each new image against every stored slot, so
//! `put` costs `O(count × image bytes)`. That is fine for the tens to low
//! hundreds of sprites an atlas holds and is the scaling limit of this
//! builder.

use atlasgen_spec::Rect;

use crate::error::{AtlasError, AtlasResult};
use crate::raster::{RasterImage, CHANNELS};
use crate::store::{Slot, SlotStore};

/// Top-left corner of a slot inside the canvas. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Slot to placement mapping produced by [`AtlasBuilder::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementTable {
    placements: Vec<Placement>,
    width: u32,
    height: u32,
}

impl PlacementTable {
    /// Placement of `slot`, if the slot existed at finalize time.
    pub fn get(&self, slot: Slot) -> Option<Placement> {
        self.placements.get(slot.index()).copied()
    }

    /// Full rectangle of `slot` in canvas coordinates.
    pub fn rect(&self, slot: Slot) -> Option<Rect> {
        self.get(slot)
            .map(|p| Rect::new(p.x, p.y, self.width, self.height))
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Placements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    /// All placement rectangles in slot order.
    pub fn rects(&self) -> Vec<Rect> {
        self.placements
            .iter()
            .map(|p| Rect::new(p.x, p.y, self.width, self.height))
            .collect()
    }
}

impl std::ops::Index<Slot> for PlacementTable {
    type Output = Placement;

    fn index(&self, slot: Slot) -> &Placement {
        &self.placements[slot.index()]
    }
}

/// The composited square atlas image, RGBA8, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    side: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A transparent black canvas.
    fn blank(side: u32) -> Self {
        Self {
            side,
            pixels: vec![0; side as usize * side as usize * CHANNELS],
        }
    }

    /// Side length in pixels.
    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.side || y >= self.side {
            return None;
        }
        let i = (y as usize * self.side as usize + x as usize) * CHANNELS;
        let p = &self.pixels[i..i + CHANNELS];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Copy out the RGBA bytes under `rect`, row-major. `None` if the rect
    /// leaves the canvas.
    pub fn region(&self, rect: &Rect) -> Option<Vec<u8>> {
        if !rect.fits_within(self.side) {
            return None;
        }
        let row_len = rect.width as usize * CHANNELS;
        let mut out = Vec::with_capacity(row_len * rect.height as usize);
        for row in 0..rect.height {
            let start = self.offset(rect.x, rect.y + row);
            out.extend_from_slice(&self.pixels[start..start + row_len]);
        }
        Some(out)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.side as usize + x as usize) * CHANNELS
    }

    /// Copy a `width`×`height` image into the canvas at `at`.
    fn blit(&mut self, at: Placement, width: u32, data: &[u8]) {
        let row_len = width as usize * CHANNELS;
        for (row, src) in data.chunks_exact(row_len).enumerate() {
            let start = self.offset(at.x, at.y + row as u32);
            self.pixels[start..start + row_len].copy_from_slice(src);
        }
    }
}

/// Smallest power of two greater than or equal to `x` (1 for 0).
pub fn least_power_of_two_ge(x: u32) -> u32 {
    x.next_power_of_two()
}

/// `ceil(sqrt(n))` in integer arithmetic.
pub fn ceil_sqrt(n: usize) -> usize {
    let mut k = (n as f64).sqrt() as usize;
    while k * k < n {
        k += 1;
    }
    while k > 0 && (k - 1) * (k - 1) >= n {
        k -= 1;
    }
    k
}

/// Side of the square canvas needed for `count` images of `image_side` pixels.
pub fn canvas_side(image_side: u32, count: usize) -> u32 {
    least_power_of_two_ge(image_side * ceil_sqrt(count) as u32)
}

/// Shelf-pack `count` uniform `width`×`height` images into a canvas of `side`.
///
/// Images are placed left to right in order; when the next one would cross
/// the right edge, the cursor wraps to the start of a new row.
pub fn pack_shelves(count: usize, width: u32, height: u32, side: u32) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(count);
    let (mut x, mut y) = (0u32, 0u32);

    for _ in 0..count {
        if x + width > side {
            x = 0;
            y += height;
        }
        placements.push(Placement { x, y });
        x += width;
    }

    placements
}

/// Deduplicating store of same-size images that packs into a single canvas.
#[derive(Debug, Clone)]
pub struct AtlasBuilder {
    store: SlotStore,
}

impl AtlasBuilder {
    /// Create a builder for `width`×`height` images.
    pub fn new(width: u32, height: u32) -> AtlasResult<Self> {
        Ok(Self {
            store: SlotStore::new(width, height)?,
        })
    }

    /// Create a builder for `size`×`size` images.
    pub fn square(size: u32) -> AtlasResult<Self> {
        Self::new(size, size)
    }

    pub fn width(&self) -> u32 {
        self.store.width()
    }

    pub fn height(&self) -> u32 {
        self.store.height()
    }

    /// Number of distinct images stored.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Stored pixels of `slot`.
    pub fn slot(&self, slot: Slot) -> Option<&[u8]> {
        self.store.slot(slot)
    }

    /// Claim a fresh slot and a writable view of it.
    pub fn allocate(&mut self) -> AtlasResult<(Slot, &mut [u8])> {
        self.store.allocate()
    }

    /// Drop every slot at index `count` and above.
    pub fn truncate(&mut self, count: usize) {
        self.store.truncate(count)
    }

    /// Store `image`, reusing the first slot with identical pixels.
    pub fn put(&mut self, image: &RasterImage) -> AtlasResult<Slot> {
        if image.width() != self.width() || image.height() != self.height() {
            return Err(AtlasError::DimensionMismatch {
                expected_width: self.width(),
                expected_height: self.height(),
                actual_width: image.width(),
                actual_height: image.height(),
            });
        }

        if let Some((slot, _)) = self
            .store
            .iter()
            .find(|(_, data)| *data == image.pixels())
        {
            return Ok(slot);
        }

        let (slot, view) = self.allocate()?;
        view.copy_from_slice(image.pixels());
        Ok(slot)
    }

    /// Pack every stored slot and composite the canvas.
    ///
    /// Does not modify the builder; calling it twice yields identical results.
    pub fn finalize(&self) -> (PlacementTable, Canvas) {
        let (width, height) = (self.width(), self.height());
        let side = canvas_side(width.max(height), self.count());

        let placements = pack_shelves(self.count(), width, height, side);

        let mut canvas = Canvas::blank(side);
        for ((_, data), &at) in self.store.iter().zip(placements.iter()) {
            canvas.blit(at, width, data);
        }

        let table = PlacementTable {
            placements,
            width,
            height,
        };
        (table, canvas)
    }
}
