//! Sidecar metadata: sprite name to resolved shape rectangles.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::error::SpecError;
use crate::shape::ShapeMetadata;

/// The sidecar document written next to each atlas PNG.
///
/// Sprite names are kept sorted so the serialized form is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtlasMetadata {
    sprites: BTreeMap<String, ShapeMetadata>,
}

impl AtlasMetadata {
    /// Create an empty metadata document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a sprite entry, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, shape: ShapeMetadata) -> Option<ShapeMetadata> {
        self.sprites.insert(name.into(), shape)
    }

    /// Look up a sprite by name.
    pub fn get(&self, name: &str) -> Option<&ShapeMetadata> {
        self.sprites.get(name)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Iterate sprites in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShapeMetadata)> {
        self.sprites.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize in the sidecar's on-disk format: one-space indentation and
    /// no space after `:`.
    pub fn to_json_string(&self) -> Result<String, SpecError> {
        let mut buf = Vec::new();
        let formatter = SidecarFormatter(PrettyFormatter::with_indent(b" "));
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse a sidecar document.
    pub fn from_json_str(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromIterator<(String, ShapeMetadata)> for AtlasMetadata {
    fn from_iter<T: IntoIterator<Item = (String, ShapeMetadata)>>(iter: T) -> Self {
        Self {
            sprites: iter.into_iter().collect(),
        }
    }
}

/// [`PrettyFormatter`] with a bare `:` between keys and values.
struct SidecarFormatter(PrettyFormatter<'static>);

impl Formatter for SidecarFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b":")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }
}
