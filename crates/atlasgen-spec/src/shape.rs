//! Sprite shapes and their resolved rectangles.

use serde::{Deserialize, Serialize};

/// A pixel rectangle inside an atlas canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this rectangle shares any pixel with `other`.
    pub fn overlaps(&self, other: &Rect) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }

    /// Whether this rectangle lies fully inside a square of side `side`.
    pub fn fits_within(&self, side: u32) -> bool {
        self.right() <= side as u64 && self.bottom() <= side as u64
    }

    // Edges are widened so coordinates read from untrusted metadata can't wrap.
    fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }
}

/// One of the six faces of a cube sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CubeFace {
    /// +X
    Xp,
    /// -X
    Xn,
    /// +Y
    Yp,
    /// -Y
    Yn,
    /// +Z
    Zp,
    /// -Z
    Zn,
}

impl CubeFace {
    /// All faces in canonical order.
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Xp,
        CubeFace::Xn,
        CubeFace::Yp,
        CubeFace::Yn,
        CubeFace::Zp,
        CubeFace::Zn,
    ];

    /// Returns the face suffix (`"xp"`, `"xn"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            CubeFace::Xp => "xp",
            CubeFace::Xn => "xn",
            CubeFace::Yp => "yp",
            CubeFace::Yn => "yn",
            CubeFace::Zp => "zp",
            CubeFace::Zn => "zn",
        }
    }

    /// Returns the SVG file name for this face inside a cube directory.
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.as_str())
    }

    /// Position of this face in [`CubeFace::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for CubeFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved rectangles for all six faces of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeRects {
    pub xp: Rect,
    pub xn: Rect,
    pub yp: Rect,
    pub yn: Rect,
    pub zp: Rect,
    pub zn: Rect,
}

impl CubeRects {
    /// Build face rectangles by calling `f` once per face in canonical order.
    pub fn from_fn(mut f: impl FnMut(CubeFace) -> Rect) -> Self {
        Self {
            xp: f(CubeFace::Xp),
            xn: f(CubeFace::Xn),
            yp: f(CubeFace::Yp),
            yn: f(CubeFace::Yn),
            zp: f(CubeFace::Zp),
            zn: f(CubeFace::Zn),
        }
    }

    /// Rectangle of a single face.
    pub fn get(&self, face: CubeFace) -> &Rect {
        match face {
            CubeFace::Xp => &self.xp,
            CubeFace::Xn => &self.xn,
            CubeFace::Yp => &self.yp,
            CubeFace::Yn => &self.yn,
            CubeFace::Zp => &self.zp,
            CubeFace::Zn => &self.zn,
        }
    }

    /// Iterate `(face, rect)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CubeFace, &Rect)> + '_ {
        CubeFace::ALL.into_iter().map(move |face| (face, self.get(face)))
    }
}

/// Resolved metadata for one named sprite, as written to the sidecar JSON.
///
/// Serializes with an inline `"shape"` tag:
///
/// ```text
/// {"shape": "icon", "x": 0, "y": 16, "width": 16, "height": 16}
/// {"shape": "cube", "xp": {...}, "xn": {...}, "yp": {...}, "yn": {...}, "zp": {...}, "zn": {...}}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum ShapeMetadata {
    /// A single flat image.
    Icon(Rect),
    /// Six face images.
    Cube(CubeRects),
}

impl ShapeMetadata {
    /// Returns the shape tag (`"icon"` or `"cube"`).
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeMetadata::Icon(_) => "icon",
            ShapeMetadata::Cube(_) => "cube",
        }
    }

    /// All rectangles of this sprite, one for an icon and six for a cube.
    pub fn rects(&self) -> Vec<Rect> {
        match self {
            ShapeMetadata::Icon(rect) => vec![*rect],
            ShapeMetadata::Cube(faces) => faces.iter().map(|(_, r)| *r).collect(),
        }
    }
}
