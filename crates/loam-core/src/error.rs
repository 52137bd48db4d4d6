//! Error types and handling for loam-core operations.
//!
//! The error surface here is deliberately small: annotation problems inside the
//! core pipeline are never fatal and are reported through
//! [`crate::diagnostics::Diagnostics`] instead. The `Error` enum only covers the
//! boundaries where work genuinely cannot continue: reading files from disk and
//! loading the schema document.

use thiserror::Error;

/// The main error type for loam-core operations.
///
/// All fallible public functions in loam-core return `Result<T, Error>`.
/// Per-object annotation failures are not errors; they are collected as
/// diagnostics and the offending value passes through unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers file system operations such as reading content files or walking
    /// the content directory. The underlying `std::io::Error` is preserved.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A content file could not be parsed.
    ///
    /// Only raised where a parse failure is fatal to the caller; the content
    /// loader downgrades per-file parse failures to warning diagnostics and
    /// skips the file instead.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The schema document is malformed.
    ///
    /// A missing schema document is not an error (the pipeline runs in
    /// pass-through mode); a present but unreadable one is.
    #[error("Schema error: {0}")]
    Schema(String),
}

/// Convenient result alias used throughout loam-core.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = Error::Schema("models must be a mapping".into());
        assert_eq!(err.to_string(), "Schema error: models must be a mapping");
    }
}
