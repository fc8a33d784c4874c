//! Content hashing.
//!
//! Source files are identified by the BLAKE3 hash of their bytes, so two
//! byte-identical files at different paths share one identity.

/// Computes the BLAKE3 hash of a byte slice as a 64-character lowercase hex string.
///
/// # Example
/// ```
/// use atlasgen_spec::hash::content_hash;
///
/// let hash = content_hash(b"<svg/>");
/// assert_eq!(hash.len(), 64);
/// ```
pub fn content_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
