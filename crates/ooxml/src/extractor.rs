//! Batch metadata extraction over a resolved set of documents.

use crate::file_info::collect_file_info;
use crate::properties::{self, CORE_PART, CUSTOM_PART};
use office_meta_core::{
    Diagnostic, DiagnosticKind, Error, Extraction, FileInfo, FileSource, MetadataRecord,
    PartOutcome, Result, ResultSet,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Extracts custom, core, and filesystem metadata from Office documents.
///
/// The source is resolved once, at construction. Every resolved file gets
/// exactly one record, even when its container or parts are unreadable.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    files: Vec<PathBuf>,
}

impl MetadataExtractor {
    /// Resolve a source into the list of documents to process.
    pub fn new(source: impl Into<FileSource>) -> Result<Self> {
        let files = source.into().resolve()?;
        log::debug!("Resolved {} candidate documents", files.len());
        Ok(Self { files })
    }

    /// Documents that will be processed, in processing order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Extract metadata for every document, keyed by base file name.
    pub fn get_metadata(&self) -> ResultSet {
        self.extract().results
    }

    /// Like [`get_metadata`](Self::get_metadata), but also returns the
    /// failures that were recovered from along the way.
    pub fn extract(&self) -> Extraction {
        let mut extraction = Extraction::default();

        for path in &self.files {
            let key = display_name(path);
            let record = extract_file(path, &mut extraction.diagnostics);
            if extraction.results.insert(key.clone(), record).is_some() {
                log::debug!("Replaced earlier entry for {}", key);
            }
        }

        extraction
    }
}

/// Build the record for one document, pushing a diagnostic per failure.
fn extract_file(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> MetadataRecord {
    log::debug!("Processing {}", path.display());
    let label = path.display().to_string();

    let (custom, core) = match open_archive(path) {
        Ok(mut archive) => (
            properties::extract_custom_properties(&mut archive),
            properties::extract_core_properties(&mut archive),
        ),
        Err(e) => {
            log::warn!("Cannot open {} as an OOXML container: {}", label, e);
            diagnostics.push(Diagnostic::new(
                &label,
                DiagnosticKind::ContainerOpenFailure,
                e.to_string(),
            ));
            (PartOutcome::Missing, PartOutcome::Missing)
        }
    };

    for (part, outcome) in [(CUSTOM_PART, &custom), (CORE_PART, &core)] {
        if let PartOutcome::Failed(reason) = outcome {
            log::warn!("Skipping {} in {}: {}", part, label, reason);
            diagnostics.push(Diagnostic::new(
                &label,
                DiagnosticKind::PartExtractionFailure,
                format!("{}: {}", part, reason),
            ));
        }
    }

    let file_info = collect_file_info(path).unwrap_or_else(|e| {
        log::warn!("Cannot stat {}: {}", label, e);
        diagnostics.push(Diagnostic::new(
            &label,
            DiagnosticKind::StatFailure,
            e.to_string(),
        ));
        FileInfo::default()
    });

    MetadataRecord {
        custom: custom.into_properties(),
        core: core.into_properties(),
        file_info,
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file = File::open(path)?;
    ZipArchive::new(BufReader::new(file))
        .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))
}

/// Base name used as the result key.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/tmp/docs/report.docx")), "report.docx");
        assert_eq!(display_name(Path::new("deck.pptx")), "deck.pptx");
    }

    #[test]
    fn test_directory_entry_is_not_a_container() {
        let dir = tempfile::tempdir().unwrap();
        let mut diagnostics = Vec::new();

        let record = extract_file(dir.path(), &mut diagnostics);
        assert!(record.custom.is_empty());
        assert!(record.core.is_empty());
        assert_eq!(diagnostics[0].kind, DiagnosticKind::ContainerOpenFailure);
    }
}
