//! Inbound event document model.
//!
//! The upstream classifier posts one `<events><event><document>` tree per
//! request. Only the document URL and the ordered field list feed the
//! conversion; the remaining metadata is carried for logging.
//!
//! Element text is kept verbatim, whitespace included. `<field>` entries are
//! collected in document order even when other elements sit between them.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Required root element.
const ROOT: &str = "events";

const EVENT: [&str; 1] = [ROOT];
const DOCUMENT: [&str; 2] = [ROOT, "event"];
const DOCUMENT_BODY: [&str; 3] = [ROOT, "event", "document"];
const FIELD_DATA: [&str; 4] = [ROOT, "event", "document", "field_data"];
const FIELD: [&str; 5] = [ROOT, "event", "document", "field_data", "field"];

/// Errors decoding an inbound XML payload.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("request body is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed event document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("root element is <{0}>, expected <events>")]
    Root(String),

    #[error("document ends inside <{0}>")]
    Unclosed(String),

    #[error("document has no root element")]
    Empty,
}

/// One `(field_name, field_value)` pair in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventField {
    pub name: String,
    /// `None` when the element was absent.
    pub value: Option<String>,
}

impl EventField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// True when the value is unset or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_deref().map_or(true, str::is_empty)
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// Parsed representation of one inbound payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDocument {
    pub sequence: String,
    pub generated: String,
    pub revision: String,
    pub workflow_id: String,
    pub document_id: String,
    pub document_status: String,
    pub number_of_pages: String,
    pub classification: String,
    pub document_url: String,
    pub image_urls: Vec<String>,
    /// Fields in XML document order.
    pub fields: Vec<EventField>,
}

impl EventDocument {
    /// Decode a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, DocumentError> {
        Self::from_xml(std::str::from_utf8(body)?)
    }

    pub fn from_xml(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        let mut doc = Self::default();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut field: Option<EventField> = None;
        let mut seen_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = element_name(&e)?;
                    check_root(&path, &name, &mut seen_root)?;
                    doc.read_attributes(&path, &name, &e)?;
                    if is_at(&path, &FIELD_DATA) && name == "field" {
                        field = Some(EventField {
                            name: String::new(),
                            value: None,
                        });
                    }
                    path.push(name);
                    text.clear();
                }
                Event::Empty(e) => {
                    let name = element_name(&e)?;
                    check_root(&path, &name, &mut seen_root)?;
                    doc.read_attributes(&path, &name, &e)?;
                    if is_at(&path, &FIELD_DATA) && name == "field" {
                        doc.fields.push(EventField {
                            name: String::new(),
                            value: None,
                        });
                    } else {
                        doc.assign(&path, &name, String::new(), &mut field);
                    }
                }
                Event::Text(t) => {
                    text.push_str(&t.unescape().map_err(quick_xml::Error::from)?);
                }
                Event::CData(c) => text.push_str(std::str::from_utf8(&c)?),
                Event::End(_) => {
                    let Some(name) = path.pop() else { continue };
                    let value = std::mem::take(&mut text);
                    if is_at(&path, &FIELD_DATA) && name == "field" {
                        doc.fields.extend(field.take());
                    } else {
                        doc.assign(&path, &name, value, &mut field);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = path.pop() {
            return Err(DocumentError::Unclosed(open));
        }
        if !seen_root {
            return Err(DocumentError::Empty);
        }
        Ok(doc)
    }

    fn read_attributes(&mut self, parent: &[String], name: &str, e: &BytesStart<'_>) -> Result<(), DocumentError> {
        if is_at(parent, &EVENT) && name == "event" {
            if let Some(sequence) = attribute(e, "sequence")? {
                self.sequence = sequence;
            }
        } else if is_at(parent, &DOCUMENT) && name == "document" {
            if let Some(revision) = attribute(e, "revision")? {
                self.revision = revision;
            }
        }
        Ok(())
    }

    /// Store the text of a closed leaf element.
    fn assign(&mut self, parent: &[String], name: &str, value: String, field: &mut Option<EventField>) {
        if is_at(parent, &DOCUMENT) && name == "generated" {
            self.generated = value;
        } else if is_at(parent, &DOCUMENT_BODY) {
            match name {
                "workflow_id" => self.workflow_id = value,
                "document_id" => self.document_id = value,
                "document_status" => self.document_status = value,
                "number_of_pages" => self.number_of_pages = value,
                "classification" => self.classification = value,
                "document_url" => self.document_url = value,
                "image_url" => self.image_urls.push(value),
                _ => {}
            }
        } else if is_at(parent, &FIELD) {
            if let Some(field) = field.as_mut() {
                match name {
                    "field_name" => field.name = value,
                    "field_value" => field.value = Some(value),
                    _ => {}
                }
            }
        }
    }
}

fn is_at(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

fn element_name(e: &BytesStart<'_>) -> Result<String, DocumentError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

fn check_root(path: &[String], name: &str, seen_root: &mut bool) -> Result<(), DocumentError> {
    if path.is_empty() {
        if name != ROOT {
            return Err(DocumentError::Root(name.to_string()));
        }
        *seen_root = true;
    }
    Ok(())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, DocumentError> {
    match e.try_get_attribute(name).map_err(quick_xml::Error::from)? {
        Some(attr) => Ok(Some(
            attr.unescape_value()
                .map_err(quick_xml::Error::from)?
                .into_owned(),
        )),
        None => Ok(None),
    }
}
