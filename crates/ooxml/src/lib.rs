//! OOXML metadata extraction backend.
//!
//! Reads `docProps/custom.xml` and `docProps/core.xml` out of .docx, .xlsx
//! and .pptx files, which are ZIP archives containing XML documents.

pub mod extractor;
pub mod file_info;
pub mod properties;
pub mod xml;

pub use extractor::MetadataExtractor;
