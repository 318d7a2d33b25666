//! Error types for Office metadata extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during Office metadata extraction.
///
/// Only the source errors are fatal. The rest are raised while reading a
/// single file and end up as diagnostics next to a degraded record.
#[derive(Error, Debug)]
pub enum Error {
    /// The extraction source is neither a directory path nor a list of paths.
    #[error("Source must be a folder path or a list of file paths, got {0}")]
    InvalidSourceKind(String),

    /// The source directory could not be listed.
    #[error("Failed to read source directory {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP container error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A part parsed but did not have the expected shape.
    #[error("Malformed part: {0}")]
    MalformedPart(String),
}
