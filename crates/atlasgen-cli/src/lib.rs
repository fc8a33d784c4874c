//! atlasgen CLI library.
//!
//! Input scanning, nested timing output, and the `build`, `inspect` and
//! `doctor` commands behind the `atlasgen` binary.

pub mod commands;
pub mod scan;
pub mod timer;
