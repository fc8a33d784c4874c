//! Property tests for the atlas builder: deduplication, growth, packing bounds
//! and compositing.

use atlasgen_backend_atlas::{canvas_side, ceil_sqrt, AtlasBuilder, RasterImage, CHANNELS};
use proptest::prelude::*;

/// A `size`×`size` image whose content is unique per `id`.
fn tagged_image(size: u32, id: u32) -> RasterImage {
    let mut pixels = vec![0u8; size as usize * size as usize * CHANNELS];
    pixels[..4].copy_from_slice(&id.to_le_bytes());
    for (i, b) in pixels.iter_mut().enumerate().skip(4) {
        *b = (i as u32).wrapping_mul(31).wrapping_add(id) as u8;
    }
    RasterImage::from_rgba(size, size, pixels).unwrap()
}

// ============================================================================
// Deduplication
// ============================================================================

proptest! {
    /// Putting the same image twice yields one slot and one new entry.
    #[test]
    fn dedup_is_idempotent(size in 1u32..8, id in any::<u32>(), prefix in 0u32..6) {
        let mut builder = AtlasBuilder::square(size).unwrap();
        for p in 0..prefix {
            builder.put(&tagged_image(size, p.wrapping_add(id).wrapping_add(1))).unwrap();
        }
        let before = builder.count();

        let image = tagged_image(size, id);
        let first = builder.put(&image).unwrap();
        let second = builder.put(&image).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(builder.count(), before + 1);
    }

    /// Images differing in a single channel get different slots.
    #[test]
    fn distinct_images_get_distinct_slots(size in 1u32..8, byte in 0usize..256, delta in 1u8..=255) {
        let a = tagged_image(size, 7);
        let mut pixels = a.pixels().to_vec();
        let i = byte % pixels.len();
        pixels[i] = pixels[i].wrapping_add(delta);
        let b = RasterImage::from_rgba(size, size, pixels).unwrap();

        let mut builder = AtlasBuilder::square(size).unwrap();
        let slot_a = builder.put(&a).unwrap();
        let slot_b = builder.put(&b).unwrap();

        prop_assert_ne!(slot_a, slot_b);
        prop_assert_eq!(builder.count(), 2);
    }

    /// Growing past capacity never disturbs stored images.
    #[test]
    fn growth_preserves_every_slot(size in 1u32..6, n in 1u32..40) {
        let mut builder = AtlasBuilder::square(size).unwrap();
        let mut slots = Vec::new();
        for id in 0..n {
            slots.push(builder.put(&tagged_image(size, id)).unwrap());
        }

        prop_assert!(builder.capacity() >= builder.count());
        for (id, slot) in slots.into_iter().enumerate() {
            prop_assert_eq!(slot.index(), id);
            let expected = tagged_image(size, id as u32);
            prop_assert_eq!(builder.slot(slot).unwrap(), expected.pixels());
        }
    }
}

// ============================================================================
// Packing and compositing
// ============================================================================

proptest! {
    /// Every placement lies inside the canvas and none overlap.
    #[test]
    fn placements_are_in_bounds_and_disjoint(size in 1u32..12, n in 0u32..50) {
        let mut builder = AtlasBuilder::square(size).unwrap();
        for id in 0..n {
            builder.put(&tagged_image(size, id)).unwrap();
        }

        let (table, canvas) = builder.finalize();
        let side = canvas.side();

        prop_assert_eq!(side, canvas_side(size, n as usize));
        prop_assert!(side.is_power_of_two());
        prop_assert!(side >= size * ceil_sqrt(n as usize) as u32);
        prop_assert_eq!(table.len(), n as usize);

        let rects = table.rects();
        for (i, a) in rects.iter().enumerate() {
            prop_assert!(a.fits_within(side), "rect {:?} leaves canvas {}", a, side);
            for b in &rects[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    /// Canvas pixels under each placement equal the slot's stored bytes.
    #[test]
    fn composite_round_trips(size in 1u32..10, n in 1u32..20) {
        let mut builder = AtlasBuilder::square(size).unwrap();
        let slots: Vec<_> = (0..n)
            .map(|id| builder.put(&tagged_image(size, id)).unwrap())
            .collect();

        let (table, canvas) = builder.finalize();
        for slot in slots {
            let rect = table.rect(slot).unwrap();
            prop_assert_eq!(canvas.region(&rect).unwrap(), builder.slot(slot).unwrap().to_vec());
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_single_image() {
    let mut builder = AtlasBuilder::square(16).unwrap();
    let slot = builder.put(&tagged_image(16, 1)).unwrap();
    assert_eq!(slot.index(), 0);

    let (table, canvas) = builder.finalize();
    assert_eq!(canvas.side(), 16);
    assert_eq!((table[slot].x, table[slot].y), (0, 0));
}

#[test]
fn test_scenario_four_images() {
    let mut builder = AtlasBuilder::square(16).unwrap();
    for id in 0..4 {
        builder.put(&tagged_image(16, id)).unwrap();
    }

    let (table, canvas) = builder.finalize();
    assert_eq!(canvas.side(), 32);
    let coords: Vec<_> = table.iter().map(|p| (p.x, p.y)).collect();
    assert_eq!(coords, vec![(0, 0), (16, 0), (0, 16), (16, 16)]);
}

#[test]
fn test_scenario_identical_copy() {
    let mut builder = AtlasBuilder::square(16).unwrap();
    let image = tagged_image(16, 42);
    let copy = RasterImage::from_rgba(16, 16, image.pixels().to_vec()).unwrap();

    builder.put(&image).unwrap();
    assert_eq!(builder.put(&copy).unwrap().index(), 0);
    assert_eq!(builder.count(), 1);
}

#[test]
fn test_scenario_empty() {
    let builder = AtlasBuilder::square(16).unwrap();
    let (table, canvas) = builder.finalize();
    assert_eq!(canvas.side(), 1);
    assert!(table.is_empty());
}
