//! Named atlas size classes.
//!
//! Each size class produces one independent atlas whose sprites are all
//! rasterized at the same square pixel size.

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// A named pixel size for one atlas build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeClass {
    /// Name used in output file names (`textures-<name>.png`).
    pub name: String,
    /// Side length of every sprite in this class, in pixels.
    pub size: u32,
}

impl SizeClass {
    /// Create a new size class.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// The built-in classes: pixel (16), simple (64), fancy (256), x-fancy (1024).
    pub fn defaults() -> Vec<SizeClass> {
        vec![
            SizeClass::new("pixel", 16),
            SizeClass::new("simple", 64),
            SizeClass::new("fancy", 256),
            SizeClass::new("x-fancy", 1024),
        ]
    }

    /// File name of the atlas image for this class.
    pub fn image_file_name(&self) -> String {
        format!("textures-{}.png", self.name)
    }

    /// File name of the sidecar metadata for this class.
    pub fn metadata_file_name(&self) -> String {
        format!("{}.json", self.image_file_name())
    }
}

impl FromStr for SizeClass {
    type Err = SpecError;

    /// Parse `name=px`, e.g. `simple=64`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| SpecError::MalformedSizeClass(s.to_string()))?;
        let name = name.trim();
        let value = value.trim();

        if name.is_empty() {
            return Err(SpecError::EmptySizeClassName);
        }

        let size = value
            .parse::<u32>()
            .ok()
            .filter(|&size| size > 0)
            .ok_or_else(|| SpecError::InvalidPixelSize {
                name: name.to_string(),
                value: value.to_string(),
            })?;

        Ok(SizeClass::new(name, size))
    }
}

/// Reject lists in which two classes share a name.
pub fn validate_size_classes(classes: &[SizeClass]) -> Result<(), SpecError> {
    let mut seen = HashSet::new();
    for class in classes {
        if !seen.insert(class.name.as_str()) {
            return Err(SpecError::DuplicateSizeClass(class.name.clone()));
        }
    }
    Ok(())
}
