//! Error types shared across the atlasgen crates.

use thiserror::Error;

/// Errors from parsing or validating shared atlasgen types.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A size class argument was not of the form `name=px`.
    #[error("Invalid size class '{0}': expected NAME=PIXELS")]
    MalformedSizeClass(String),

    /// A size class had an empty name.
    #[error("Size class name must not be empty")]
    EmptySizeClassName,

    /// A size class had a zero or unparsable pixel size.
    #[error("Invalid pixel size '{value}' for size class '{name}'")]
    InvalidPixelSize {
        /// Size class name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// Two size classes share a name.
    #[error("Duplicate size class name: '{0}'")]
    DuplicateSizeClass(String),

    /// Metadata JSON could not be parsed or produced.
    #[error("Metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Common interface for errors raised by atlasgen backends.
///
/// Backends (atlas, svg) implement this so the CLI can report errors with a
/// stable code and category regardless of which backend failed.
///
/// # Example
///
/// ```ignore
/// use atlasgen_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Get the error code for reporting.
    ///
    /// Returns a static string like "ATLAS_001" or "SVG_004". These codes are
    /// stable and can be used for programmatic error handling.
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Get the error category ("atlas", "svg").
    fn category(&self) -> &'static str;
}

/// A type-erased backend error carrying its code, message and category.
#[derive(Debug)]
pub struct GenerationError {
    /// The error code (e.g., "ATLAS_001").
    pub code: &'static str,
    /// The human-readable error message.
    pub message: String,
    /// The error category (e.g., "atlas", "svg").
    pub category: &'static str,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GenerationError {
    /// Create a `GenerationError` from any `BackendError` implementor.
    pub fn from_backend<E: BackendError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            category: err.category(),
            source: Some(Box::new(err)),
        }
    }

    /// Create a `GenerationError` with explicit values.
    pub fn new(code: &'static str, message: impl Into<String>, category: &'static str) -> Self {
        Self {
            code,
            message: message.into(),
            category,
            source: None,
        }
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
