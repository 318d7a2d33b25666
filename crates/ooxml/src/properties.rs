//! Custom and core document property extraction.

use crate::xml::{self, Element};
use office_meta_core::{Error, PartOutcome, PropertyMap, Result};
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

/// Location of the custom properties part.
pub const CUSTOM_PART: &str = "docProps/custom.xml";

/// Location of the core properties part.
pub const CORE_PART: &str = "docProps/core.xml";

/// Default namespace of `docProps/custom.xml`.
pub const CUSTOM_PROPERTIES_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";

/// Typed value (`vt:`) namespace used inside custom properties.
pub const VTYPES_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

/// Namespaces found in `docProps/core.xml`.
pub const CORE_PROPERTIES_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";
pub const DCTERMS_NS: &str = "http://purl.org/dc/terms/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Extract custom properties from an open container.
pub fn extract_custom_properties<R: Read + Seek>(archive: &mut ZipArchive<R>) -> PartOutcome {
    extract_part(archive, CUSTOM_PART, parse_custom_properties)
}

/// Extract core properties from an open container.
pub fn extract_core_properties<R: Read + Seek>(archive: &mut ZipArchive<R>) -> PartOutcome {
    extract_part(archive, CORE_PART, parse_core_properties)
}

/// Parse `docProps/custom.xml`.
///
/// Each `property` child of the root contributes its `name` attribute and
/// the text of its first child (the `vt:*` value wrapper). A property
/// without a name or without a value element fails the whole part.
pub fn parse_custom_properties(content: &[u8]) -> Result<PropertyMap> {
    let root = xml::parse(content)?;
    let property_tag = xml::qualified(CUSTOM_PROPERTIES_NS, "property");

    let mut props = PropertyMap::new();
    for property in root.children_named(&property_tag) {
        let name = property.attribute("name").ok_or_else(|| {
            Error::MalformedPart("custom property without a name attribute".to_string())
        })?;
        let value = property.children.first().ok_or_else(|| {
            Error::MalformedPart(format!("custom property '{}' has no value element", name))
        })?;
        props.insert(name, value.text.clone());
    }

    Ok(props)
}

/// Parse `docProps/core.xml`.
///
/// Every direct child of the root is recorded under its local name,
/// whatever its namespace. A repeated name keeps the last value.
pub fn parse_core_properties(content: &[u8]) -> Result<PropertyMap> {
    let root = xml::parse(content)?;
    Ok(root
        .children
        .iter()
        .map(|child: &Element| (child.local_name(), child.text.clone()))
        .collect())
}

fn extract_part<R, F>(archive: &mut ZipArchive<R>, path: &str, parse: F) -> PartOutcome
where
    R: Read + Seek,
    F: FnOnce(&[u8]) -> Result<PropertyMap>,
{
    let content = match read_part(archive, path) {
        Ok(Some(content)) => content,
        Ok(None) => {
            log::debug!("No {} in container", path);
            return PartOutcome::Missing;
        }
        Err(e) => return PartOutcome::Failed(e.to_string()),
    };

    match parse(&content) {
        Ok(props) => {
            log::debug!("Read {} properties from {}", props.len(), path);
            PartOutcome::Extracted(props)
        }
        Err(e) => PartOutcome::Failed(e.to_string()),
    }
}

/// Read a part from the archive, `None` when the container has no such entry.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<Vec<u8>>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(Error::ZipError(format!("Failed to open '{}': {}", path, e)));
        }
    };

    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(Some(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/custom-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="Author"><vt:lpwstr>Jane</vt:lpwstr></property>
  <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="3" name="Budget"><vt:r8>1234.5</vt:r8></property>
  <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="4" name="Blank"><vt:lpwstr/></property>
</Properties>"#;

    const CORE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>Report</dc:title>
  <dc:creator>Jane Doe</dc:creator>
  <cp:keywords></cp:keywords>
  <cp:revision>3</cp:revision>
  <dcterms:created xsi:type="dcterms:W3CDTF">2024-01-02T03:04:05Z</dcterms:created>
</cp:coreProperties>"#;

    #[test]
    fn test_parse_custom_properties() {
        let props = parse_custom_properties(CUSTOM_XML.as_bytes()).unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["Author", "Budget", "Blank"]);
        assert_eq!(props.get("Author"), Some(&Some("Jane".to_string())));
        assert_eq!(props.get("Budget"), Some(&Some("1234.5".to_string())));
        assert_eq!(props.get("Blank"), Some(&None));
    }

    #[test]
    fn test_custom_properties_ignore_foreign_namespace() {
        let content = format!(
            r#"<Properties xmlns="{}" xmlns:vt="{}" xmlns:o="urn:other">
                <o:property name="Ignored"><vt:lpwstr>x</vt:lpwstr></o:property>
                <property name="Kept"><vt:lpwstr>y</vt:lpwstr></property>
            </Properties>"#,
            CUSTOM_PROPERTIES_NS, VTYPES_NS
        );
        let props = parse_custom_properties(content.as_bytes()).unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["Kept"]);
    }

    #[test]
    fn test_custom_property_without_value_fails_whole_part() {
        let content = format!(
            r#"<Properties xmlns="{}" xmlns:vt="{}">
                <property name="Good"><vt:lpwstr>ok</vt:lpwstr></property>
                <property name="Bad"></property>
            </Properties>"#,
            CUSTOM_PROPERTIES_NS, VTYPES_NS
        );
        assert!(parse_custom_properties(content.as_bytes()).is_err());
    }

    #[test]
    fn test_custom_property_without_name_fails() {
        let content = format!(
            r#"<Properties xmlns="{}" xmlns:vt="{}"><property><vt:i4>1</vt:i4></property></Properties>"#,
            CUSTOM_PROPERTIES_NS, VTYPES_NS
        );
        assert!(parse_custom_properties(content.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_core_properties() {
        let props = parse_core_properties(CORE_XML.as_bytes()).unwrap();
        assert_eq!(
            props.keys().collect::<Vec<_>>(),
            vec!["title", "creator", "keywords", "revision", "created"]
        );
        assert_eq!(props.get("title"), Some(&Some("Report".to_string())));
        assert_eq!(props.get("keywords"), Some(&None));
        assert_eq!(
            props.get("created"),
            Some(&Some("2024-01-02T03:04:05Z".to_string()))
        );
    }

    #[test]
    fn test_core_properties_malformed() {
        assert!(parse_core_properties(b"<cp:coreProperties>").is_err());
    }
}
