//! Minimal namespace-aware XML tree for docProps parts.
//!
//! Element names are stored in Clark notation (`{uri}local`) once their
//! prefix has been resolved, so lookups never depend on which prefix a
//! producer happened to choose.

use office_meta_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Namespace bound to the reserved `xml` prefix.
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// A parsed XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name in Clark notation, or the bare name when the element
    /// has no namespace.
    pub tag: String,

    /// Attributes other than namespace declarations.
    pub attributes: Vec<(String, String)>,

    /// Text before the first child element, `None` when there is none.
    pub text: Option<String>,

    pub children: Vec<Element>,
}

impl Element {
    fn new(tag: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag,
            attributes,
            text: None,
            children: Vec::new(),
        }
    }

    /// The tag with its namespace stripped.
    pub fn local_name(&self) -> &str {
        local_name(&self.tag)
    }

    /// Look up an attribute by (resolved) name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct children with the given qualified tag.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    fn push_text(&mut self, text: &str) {
        // Text after a child element is that child's tail, not ours.
        if self.children.is_empty() {
            self.text.get_or_insert_with(String::new).push_str(text);
        }
    }
}

/// Strip the `{namespace}` part of a Clark-notation name.
pub fn local_name(tag: &str) -> &str {
    tag.rsplit_once('}').map_or(tag, |(_, local)| local)
}

/// Build a Clark-notation name.
pub fn qualified(namespace: &str, local: &str) -> String {
    format!("{{{}}}{}", namespace, local)
}

/// Parse a complete XML document and return its root element.
pub fn parse(bytes: &[u8]) -> Result<Element> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut scopes = NamespaceScopes::default();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Start(ref e) => {
                ensure_single_root(&stack, &root)?;
                stack.push(scopes.open(e)?);
            }
            Event::Empty(ref e) => {
                ensure_single_root(&stack, &root)?;
                let element = scopes.open(e)?;
                scopes.close();
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlError("unexpected closing tag".to_string()))?;
                scopes.close();
                attach(&mut stack, &mut root, element);
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(xml_error)?;
                add_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| Error::XmlError(format!("invalid UTF-8 in CDATA: {}", e)))?;
                add_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::XmlError(format!("unclosed element {}", open.tag)));
    }
    root.ok_or_else(|| Error::XmlError("no root element".to_string()))
}

fn xml_error(e: impl std::fmt::Display) -> Error {
    Error::XmlError(e.to_string())
}

fn ensure_single_root(stack: &[Element], root: &Option<Element>) -> Result<()> {
    if stack.is_empty() && root.is_some() {
        return Err(Error::XmlError("junk after document element".to_string()));
    }
    Ok(())
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn add_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => current.push_text(text),
        None if !text.trim().is_empty() => {
            return Err(Error::XmlError("text outside of the document element".to_string()));
        }
        None => {}
    }
    Ok(())
}

/// In-scope namespace declarations, one frame per open element.
#[derive(Debug, Default)]
struct NamespaceScopes {
    frames: Vec<Vec<(Option<String>, String)>>,
}

impl NamespaceScopes {
    /// Enter an element: record its declarations and resolve its names.
    fn open(&mut self, start: &BytesStart) -> Result<Element> {
        let mut declarations = Vec::new();
        let mut attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(xml_error)?
                .to_string();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();

            if key == "xmlns" {
                declarations.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                declarations.push((Some(prefix.to_string()), value));
            } else {
                attributes.push((key, value));
            }
        }
        self.frames.push(declarations);

        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(xml_error)?
            .to_string();
        let tag = self.resolve(&name, true)?;

        // Unprefixed attributes never pick up the default namespace.
        let attributes = attributes
            .into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                Ok((self.resolve(&key, false)?, value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Element::new(tag, attributes))
    }

    fn close(&mut self) {
        self.frames.pop();
    }

    fn resolve(&self, name: &str, use_default: bool) -> Result<String> {
        let (prefix, local) = match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, name),
        };

        let namespace = match prefix {
            Some("xml") => Some(XML_NS),
            Some(prefix) => Some(
                self.lookup(Some(prefix))
                    .ok_or_else(|| Error::XmlError(format!("unbound prefix '{}'", prefix)))?,
            ),
            None if use_default => self.lookup(None),
            None => None,
        };

        Ok(match namespace {
            Some(uri) if !uri.is_empty() => qualified(uri, local),
            _ => local.to_string(),
        })
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(declared, _)| declared.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
    }
}
