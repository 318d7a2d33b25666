//! Domain types for representing extracted document metadata.

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Supported Office Open XML document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OfficeFormat {
    /// Word document.
    Docx,
    /// Excel workbook.
    Xlsx,
    /// PowerPoint presentation.
    Pptx,
}

impl OfficeFormat {
    /// Every supported format, in extension-check order.
    pub const ALL: [OfficeFormat; 3] = [Self::Docx, Self::Xlsx, Self::Pptx];

    /// File extension for this format, lowercase and without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
            Self::Pptx => "pptx",
        }
    }

    /// Detect format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(Self::Docx),
            "xlsx" => Some(Self::Xlsx),
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from the end of a file name or path string.
    ///
    /// This is a plain suffix test, so a bare `.docx` name matches too.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|format| {
            lower
                .strip_suffix(format.extension())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

/// A string-keyed map that remembers insertion order.
///
/// Inserting a key that is already present replaces its value and keeps its
/// original position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a value, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k, v)))
    }
}

/// Property name to text value. A `None` value is an element with no text.
pub type PropertyMap = OrderedMap<Option<String>>;

/// Base file name to extracted record, in processing order.
pub type ResultSet = OrderedMap<MetadataRecord>;

/// Filesystem attributes of a processed file.
///
/// Fields are absent (and skipped when serializing) when the stat call
/// failed, so a failed stat serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Last modification time, local ISO-8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,

    /// Creation time, local ISO-8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl FileInfo {
    /// True when no attribute could be collected.
    pub fn is_empty(&self) -> bool {
        self.file_size.is_none() && self.modified_time.is_none() && self.created_time.is_none()
    }
}

/// Metadata extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Custom properties from `docProps/custom.xml`.
    pub custom: PropertyMap,

    /// Core properties from `docProps/core.xml`, keyed by local tag name.
    pub core: PropertyMap,

    /// Filesystem attributes.
    pub file_info: FileInfo,
}

/// Outcome of extracting one XML part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartOutcome {
    /// The part was present and parsed.
    Extracted(PropertyMap),
    /// The container has no such part.
    Missing,
    /// The part was present but could not be read or parsed.
    Failed(String),
}

impl PartOutcome {
    /// Collapse to the properties shown in the report; missing and failed
    /// parts both become an empty map.
    pub fn into_properties(self) -> PropertyMap {
        match self {
            Self::Extracted(props) => props,
            Self::Missing | Self::Failed(_) => PropertyMap::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Category of a recovered per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// The file could not be opened as a zip container.
    ContainerOpenFailure,
    /// A docProps part could not be read or parsed.
    PartExtractionFailure,
    /// Filesystem metadata was unavailable.
    StatFailure,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ContainerOpenFailure => "container open failure",
            Self::PartExtractionFailure => "part extraction failure",
            Self::StatFailure => "stat failure",
        };
        f.write_str(name)
    }
}

/// A recovered failure attached to a processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Path of the file as it was resolved from the source.
    pub file: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(file: impl Into<String>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.file, self.kind, self.message)
    }
}

/// Results of one extraction run along with the failures it recovered from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub results: ResultSet,
    pub diagnostics: Vec<Diagnostic>,
}
