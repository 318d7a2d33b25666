//! Core domain types, errors, and source resolution for Office
//! metadata extraction.

pub mod error;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use source::FileSource;
pub use types::{
    Diagnostic, DiagnosticKind, Extraction, FileInfo, MetadataRecord, OfficeFormat, OrderedMap,
    PartOutcome, PropertyMap, ResultSet,
};
