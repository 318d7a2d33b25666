//! Resolution of an extraction source into candidate document paths.

use crate::error::{Error, Result};
use crate::types::OfficeFormat;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the documents to inspect come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// Every supported document directly inside a folder (not recursive).
    Directory(PathBuf),
    /// An explicit list of candidate paths.
    Paths(Vec<PathBuf>),
}

impl FileSource {
    /// Build a source from a loosely typed value: a string names a
    /// directory, an array of strings lists candidate files.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::String(dir) => Ok(Self::Directory(PathBuf::from(dir))),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(path) => Ok(PathBuf::from(path)),
                    other => Err(Error::InvalidSourceKind(format!(
                        "list containing {}",
                        json_kind(other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Paths),
            other => Err(Error::InvalidSourceKind(json_kind(other).to_string())),
        }
    }

    /// Resolve into an ordered list of existing candidate files.
    ///
    /// Directory sources are listed once, sorted by file name. Path sources
    /// keep their input order and drop entries that have an unsupported
    /// extension or are not regular files.
    pub fn resolve(&self) -> Result<Vec<PathBuf>> {
        match self {
            Self::Directory(dir) => list_directory(dir),
            Self::Paths(paths) => Ok(paths
                .iter()
                .filter(|path| {
                    let keep = is_supported(path) && path.is_file();
                    if !keep {
                        log::debug!("Skipping {}", path.display());
                    }
                    keep
                })
                .cloned()
                .collect()),
        }
    }
}

impl From<&str> for FileSource {
    fn from(dir: &str) -> Self {
        Self::Directory(PathBuf::from(dir))
    }
}

impl From<PathBuf> for FileSource {
    fn from(dir: PathBuf) -> Self {
        Self::Directory(dir)
    }
}

impl From<&Path> for FileSource {
    fn from(dir: &Path) -> Self {
        Self::Directory(dir.to_path_buf())
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for FileSource {
    fn from(paths: Vec<P>) -> Self {
        Self::Paths(paths.into_iter().map(Into::into).collect())
    }
}

/// Check whether a path ends with a supported document extension.
pub fn is_supported(path: &Path) -> bool {
    OfficeFormat::from_name(&path.to_string_lossy()).is_some()
}

fn list_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let unreadable = |source| Error::SourceUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let name = entry.file_name();
        if OfficeFormat::from_name(&name.to_string_lossy()).is_none() {
            continue;
        }
        if entry.path().is_dir() {
            log::debug!("Skipping directory {}", entry.path().display());
            continue;
        }
        files.push(entry.path());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_from_json_rejects_integer() {
        let err = FileSource::from_json(&json!(42)).unwrap_err();
        assert!(matches!(err, Error::InvalidSourceKind(_)));
    }

    #[test]
    fn test_from_json_rejects_mixed_list() {
        let err = FileSource::from_json(&json!(["a.docx", 7])).unwrap_err();
        assert!(matches!(err, Error::InvalidSourceKind(_)));
    }

    #[test]
    fn test_from_json_accepts_string_and_list() {
        assert_eq!(
            FileSource::from_json(&json!("docs")).unwrap(),
            FileSource::Directory(PathBuf::from("docs"))
        );
        assert_eq!(
            FileSource::from_json(&json!(["a.docx", "b.xlsx"])).unwrap(),
            FileSource::Paths(vec![PathBuf::from("a.docx"), PathBuf::from("b.xlsx")])
        );
    }

    #[test]
    fn test_directory_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.DOCX");
        touch(dir.path(), "a.pptx");
        touch(dir.path(), "sheet.xlsx");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "legacy.doc");
        fs::create_dir(dir.path().join("folder.docx")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "deep.docx");

        let files = FileSource::from(dir.path()).resolve().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.pptx", "b.DOCX", "sheet.xlsx"]);
    }

    #[test]
    fn test_missing_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::from(dir.path().join("absent"))
            .resolve()
            .unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));
    }

    #[test]
    fn test_paths_keep_order_and_drop_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let second = touch(dir.path(), "second.xlsx");
        let first = touch(dir.path(), "first.docx");
        let wrong = touch(dir.path(), "readme.md");
        let missing = dir.path().join("missing.pptx");

        let source = FileSource::Paths(vec![second.clone(), wrong, missing, first.clone()]);
        assert_eq!(source.resolve().unwrap(), vec![second, first]);
    }
}
