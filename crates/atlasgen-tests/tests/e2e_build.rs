//! End-to-End Build Tests for atlasgen
//!
//! Runs whole builds over temporary asset directories with an in-process
//! rasterizer and checks the atlas images and metadata written to disk.

use std::fs;

use atlasgen_backend_svg::RasterCache;
use atlasgen_cli::commands::build::{build_all, write_report, BuildOptions, BuildSummary};
use atlasgen_spec::{AtlasMetadata, Rect, ShapeMetadata, SizeClass};
use atlasgen_tests::{color_for, read_png, AssetDir, HashSource};
use pretty_assertions::assert_eq;

fn two_sizes(dir: &AssetDir) -> BuildOptions {
    BuildOptions::new(dir.input(), dir.output())
        .size_classes(vec![SizeClass::new("pixel", 16), SizeClass::new("simple", 64)])
        .quiet(true)
}

fn load_metadata(dir: &AssetDir, class: &str) -> AtlasMetadata {
    let path = dir.output().join(format!("textures-{}.png.json", class));
    let json = fs::read_to_string(&path).expect("metadata should be written");
    AtlasMetadata::from_json_str(&json).expect("metadata should parse")
}

// ============================================================================
// Output layout
// ============================================================================

/// Every size class writes an atlas and a sidecar.
#[test]
fn test_build_writes_atlas_and_metadata_per_class() {
    let dir = AssetDir::new()
        .icon("coin", "<svg id='coin'/>")
        .icon("gem", "<svg id='gem'/>")
        .file("README.md", "not a sprite");

    let summary = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();
    assert_eq!((summary.successful, summary.failed), (2, 0));
    assert_eq!(summary.assets, 2);

    for class in ["pixel", "simple"] {
        assert!(dir.output().join(format!("textures-{}.png", class)).is_file());
        let metadata = load_metadata(&dir, class);
        let names: Vec<_> = metadata.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["coin", "gem"]);
    }
}

/// Sprite rectangles point at pixels of the sprite's own color.
#[test]
fn test_atlas_pixels_match_metadata() {
    let coin = "<svg id='coin'/>";
    let gem = "<svg id='gem'/>";
    let dir = AssetDir::new().icon("coin", coin).icon("gem", gem);

    build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();

    let metadata = load_metadata(&dir, "simple");
    let atlas = read_png(&dir.output().join("textures-simple.png"));
    assert_eq!((atlas.width, atlas.height), (128, 128));

    for (name, body) in [("coin", coin), ("gem", gem)] {
        let Some(ShapeMetadata::Icon(rect)) = metadata.get(name).copied() else {
            panic!("{} should be an icon", name);
        };
        assert_eq!((rect.width, rect.height), (64, 64));
        assert_eq!(atlas.pixel(rect.x, rect.y), color_for(body.as_bytes()));
        assert_eq!(
            atlas.pixel(rect.x + 63, rect.y + 63),
            color_for(body.as_bytes())
        );
    }
}

/// Cube faces are reported with row and column swapped.
#[test]
fn test_cube_metadata_uses_swapped_axes() {
    let dir = AssetDir::new().cube("skybox", ["a", "b", "c", "d", "e", "f"]);

    build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();

    let metadata = load_metadata(&dir, "simple");
    let Some(ShapeMetadata::Cube(faces)) = metadata.get("skybox").copied() else {
        panic!("skybox should be a cube");
    };
    // Six 64px faces pack into a 256px canvas, four per row
    assert_eq!(faces.xp, Rect::new(0, 0, 64, 64));
    assert_eq!(faces.yp, Rect::new(0, 128, 64, 64));
    assert_eq!(faces.zp, Rect::new(64, 0, 64, 64));
    assert_eq!(faces.zn, Rect::new(64, 64, 64, 64));

    let atlas = read_png(&dir.output().join("textures-simple.png"));
    assert_eq!(atlas.width, 256);
    // The third face's pixels are at column 128, row 0
    assert_eq!(atlas.pixel(128, 0), color_for(b"c"));
}

// ============================================================================
// Deduplication
// ============================================================================

/// Identical icons and cube faces share one atlas cell.
#[test]
fn test_identical_sprites_share_a_cell() {
    let dir = AssetDir::new()
        .icon("a", "<svg/>")
        .icon("b", "<svg/>")
        .cube("dice", ["<svg/>"; 6]);

    let summary = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();
    let pixel = &summary.classes[0];
    assert_eq!(pixel.sprites, 3);
    assert_eq!(pixel.unique_images, 1);
    assert_eq!(pixel.canvas_side, Some(16));

    let metadata = load_metadata(&dir, "pixel");
    for (_, shape) in metadata.iter() {
        for rect in shape.rects() {
            assert_eq!(rect, Rect::new(0, 0, 16, 16));
        }
    }
}

/// The content cache rasterizes byte-identical files once per size.
#[test]
fn test_cache_skips_identical_files() {
    let dir = AssetDir::new()
        .icon("a", "<svg/>")
        .icon("b", "<svg/>")
        .icon("c", "<svg id='c'/>");

    let mut cache = RasterCache::new(HashSource::default());
    build_all(&two_sizes(&dir), &mut cache).unwrap();

    assert_eq!(cache.misses(), 4);
    assert_eq!(cache.hits(), 2);
    assert_eq!(cache.into_inner().calls, 4);
}

// ============================================================================
// Determinism and failures
// ============================================================================

/// Two builds of the same input produce byte-identical files.
#[test]
fn test_build_is_deterministic() {
    let dir = AssetDir::new()
        .icon("coin", "<svg id='coin'/>")
        .cube("crate", ["1", "2", "3", "4", "5", "6"]);

    let first = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();
    let png_a = fs::read(dir.output().join("textures-pixel.png")).unwrap();
    let json_a = fs::read(dir.output().join("textures-pixel.png.json")).unwrap();

    let second = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();
    let png_b = fs::read(dir.output().join("textures-pixel.png")).unwrap();
    let json_b = fs::read(dir.output().join("textures-pixel.png.json")).unwrap();

    assert_eq!(png_a, png_b);
    assert_eq!(json_a, json_b);
    assert_eq!(first.classes[0].png_hash, second.classes[0].png_hash);
}

/// A cube missing a face fails every class and writes nothing.
#[test]
fn test_incomplete_cube_fails_class() {
    let dir = AssetDir::new().icon("coin", "<svg/>");
    let cube = dir.input().join("broken");
    fs::create_dir(&cube).unwrap();
    fs::write(cube.join("xp.svg"), "<svg/>").unwrap();

    let summary = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();
    assert_eq!((summary.successful, summary.failed), (0, 2));
    for class in &summary.classes {
        let error = class.error.as_deref().unwrap();
        assert!(error.starts_with("[ATLAS_005]"), "{}", error);
        assert!(error.contains("xn.svg"), "{}", error);
    }
    assert!(!dir.output().join("textures-pixel.png").exists());
}

/// The report captures per-class results.
#[test]
fn test_report_written() {
    let dir = AssetDir::new().icon("coin", "<svg/>");
    let summary = build_all(&two_sizes(&dir), &mut HashSource::default()).unwrap();

    let path = dir.output().join("report.json");
    write_report(&summary, &path).unwrap();

    let loaded: BuildSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.classes.len(), 2);
    assert_eq!(loaded.classes[1].name, "simple");
    assert_eq!(loaded.classes[1].canvas_side, Some(64));
    assert!(loaded.classes[1].png_hash.is_some());
}
