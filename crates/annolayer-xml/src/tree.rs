//! Ordered XML tree.
//!
//! A small owned DOM that keeps element order, attribute order, comments,
//! CDATA sections, processing instructions and the document type line.
//! Text is kept verbatim; only whitespace-only text between elements is
//! dropped on read and regenerated by the indenting writer.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::error::{Result, XmlError};

/// A node inside an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// `<!DOCTYPE ...>` content, raw. Only found in the prolog.
    DocType(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, keeping its position if it already exists.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }
}

/// A parsed document: nodes before the root plus the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
}

/// Parse `text` into an [`XmlDocument`].
pub fn parse_document(text: &str) -> Result<XmlDocument> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut prolog = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Parse {
            position: reader.error_position(),
            message: e.to_string(),
        })?;
        let node = match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start, reader.buffer_position())?);
                continue;
            }
            Event::End(_) => match stack.pop() {
                Some(mut element) => {
                    drop_indentation(&mut element);
                    XmlNode::Element(element)
                }
                None => {
                    return Err(XmlError::Parse {
                        position: reader.buffer_position(),
                        message: "unexpected closing tag".to_string(),
                    });
                }
            },
            Event::Empty(start) => {
                XmlNode::Element(element_from_start(&start, reader.buffer_position())?)
            }
            Event::Text(text) => XmlNode::Text(unescaped(&text, reader.buffer_position())?),
            Event::GeneralRef(reference) => {
                let raw = format!("&{};", utf8(&reference, reader.buffer_position())?);
                XmlNode::Text(unescape_at(&raw, reader.buffer_position())?.into_owned())
            }
            Event::CData(data) => XmlNode::CData(utf8(&data, reader.buffer_position())?.to_string()),
            Event::Comment(comment) => {
                XmlNode::Comment(utf8(&comment, reader.buffer_position())?.to_string())
            }
            Event::PI(pi) => {
                XmlNode::ProcessingInstruction(utf8(&pi, reader.buffer_position())?.to_string())
            }
            Event::DocType(doctype) => {
                XmlNode::DocType(utf8(&doctype, reader.buffer_position())?.to_string())
            }
            Event::Decl(_) => continue,
            Event::Eof => break,
        };

        match stack.last_mut() {
            Some(parent) => push_child(parent, node),
            None => match node {
                XmlNode::Element(element) if root.is_none() => root = Some(element),
                XmlNode::Element(element) => {
                    return Err(XmlError::Parse {
                        position: reader.buffer_position(),
                        message: format!("second root element <{}>", element.name),
                    });
                }
                XmlNode::Text(_) | XmlNode::CData(_) => {}
                other if root.is_none() => prolog.push(other),
                _ => {}
            },
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Parse {
            position: reader.buffer_position(),
            message: format!("unclosed element <{}>", open.name),
        });
    }
    let root = root.ok_or(XmlError::MissingRoot)?;
    Ok(XmlDocument { prolog, root })
}

/// Serialize `document` with a UTF-8 declaration and 2-space indentation.
pub fn write_document(document: &XmlDocument) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    for node in &document.prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, &document.root)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| XmlError::Serialize {
        message: e.to_string(),
    })
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Element(element) => write_element(writer, element),
        XmlNode::Text(text) => emit(writer, Event::Text(BytesText::new(text))),
        XmlNode::CData(data) => emit(writer, Event::CData(BytesCData::new(data.as_str()))),
        XmlNode::Comment(comment) => {
            emit(writer, Event::Comment(BytesText::from_escaped(comment.as_str())))
        }
        XmlNode::ProcessingInstruction(content) => {
            emit(writer, Event::PI(BytesPI::new(content.as_str())))
        }
        XmlNode::DocType(content) => {
            emit(writer, Event::DocType(BytesText::from_escaped(content.as_str())))
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }
    emit(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Serialize {
            message: e.to_string(),
        })
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<XmlElement> {
    let name = utf8(start.name().as_ref(), position)?.to_string();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Parse {
            position,
            message: e.to_string(),
        })?;
        let key = utf8(attribute.key.as_ref(), position)?.to_string();
        let raw = utf8(&attribute.value, position)?;
        let value = unescape_at(raw, position)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Append `node`, merging adjacent text (entity references arrive as
/// separate events).
fn push_child(parent: &mut XmlElement, node: XmlNode) {
    if let XmlNode::Text(text) = &node
        && let Some(XmlNode::Text(previous)) = parent.children.last_mut()
    {
        previous.push_str(text);
        return;
    }
    parent.children.push(node);
}

/// Remove whitespace-only text children once all pieces of each text run
/// (entity references included) have been merged.
fn drop_indentation(element: &mut XmlElement) {
    element
        .children
        .retain(|child| !matches!(child, XmlNode::Text(text) if text.trim().is_empty()));
}

fn unescaped(bytes: &[u8], position: u64) -> Result<String> {
    let raw = utf8(bytes, position)?;
    Ok(unescape_at(raw, position)?.into_owned())
}

fn unescape_at(raw: &str, position: u64) -> Result<Cow<'_, str>> {
    unescape(raw).map_err(|e| XmlError::Parse {
        position,
        message: e.to_string(),
    })
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::Parse {
        position,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_attribute_and_child_order() {
        let doc = parse_document(
            r#"<?xml version="1.0"?>
<!-- exported -->
<Root b="2" a="1">
  <Second/>
  <First x="&lt;y&gt;">text &amp; more</First>
  <![CDATA[raw <data>]]>
</Root>"#,
        )
        .unwrap();

        assert_eq!(doc.prolog, vec![XmlNode::Comment(" exported ".to_string())]);
        assert_eq!(
            doc.root.attributes,
            vec![
                ("b".to_string(), "2".to_string()),
                ("a".to_string(), "1".to_string())
            ]
        );
        let names: Vec<&str> = doc.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);

        let first = doc.root.child_elements().nth(1).unwrap();
        assert_eq!(first.attribute("x"), Some("<y>"));
        assert_eq!(first.children, vec![XmlNode::Text("text & more".to_string())]);
        assert_eq!(
            doc.root.children.last(),
            Some(&XmlNode::CData("raw <data>".to_string()))
        );
    }

    #[test]
    fn written_tree_parses_back_identically() {
        let original = parse_document(
            r#"<Root v="a&quot;b"><A><B k="1"/>hello</A><!--note--><C/></Root>"#,
        )
        .unwrap();
        let text = write_document(&original).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(parse_document(&text).unwrap(), original);
    }

    #[test]
    fn entity_references_keep_surrounding_spaces() {
        let doc = parse_document(
            "<Annotation Id=\"1\" Name=\"duct\"><Note>Tom &amp; Jerry</Note><Empty> </Empty></Annotation>",
        )
        .unwrap();
        let note = doc.root.child_elements().next().unwrap();
        assert_eq!(note.children, vec![XmlNode::Text("Tom & Jerry".to_string())]);
        let empty = doc.root.child_elements().nth(1).unwrap();
        assert!(empty.children.is_empty());

        let text = write_document(&doc).unwrap();
        assert!(text.contains("<Note>Tom &amp; Jerry</Note>"));
        assert_eq!(parse_document(&text).unwrap(), doc);
    }

    #[test]
    fn multiline_text_survives_rewrite() {
        let doc = parse_document("<Root><Text>line one\n  line two</Text>\n  <Next/>\n</Root>")
            .unwrap();
        let text_node = doc.root.child_elements().next().unwrap();
        assert_eq!(
            text_node.children,
            vec![XmlNode::Text("line one\n  line two".to_string())]
        );
        assert_eq!(parse_document(&write_document(&doc).unwrap()).unwrap(), doc);
    }

    #[test]
    fn doctype_is_kept_in_prolog() {
        let doc = parse_document(
            "<?xml version=\"1.0\"?>\n<!DOCTYPE Annotations SYSTEM \"annotations.dtd\">\n<Annotations/>",
        )
        .unwrap();
        assert_eq!(
            doc.prolog,
            vec![XmlNode::DocType(
                "Annotations SYSTEM \"annotations.dtd\"".to_string()
            )]
        );

        let text = write_document(&doc).unwrap();
        assert!(text.contains("<!DOCTYPE Annotations SYSTEM \"annotations.dtd\">"));
        assert_eq!(parse_document(&text).unwrap(), doc);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(matches!(parse_document("<a><b></a>"), Err(XmlError::Parse { .. })));
        assert!(matches!(parse_document("<a>"), Err(XmlError::Parse { .. })));
        assert!(matches!(parse_document("<!-- only -->"), Err(XmlError::MissingRoot)));
        assert!(matches!(parse_document("<a/><b/>"), Err(XmlError::Parse { .. })));
    }

    #[test]
    fn set_attribute_keeps_position() {
        let mut element = XmlElement::new("Annotation")
            .with_attribute("Id", "1")
            .with_attribute("Name", "fat");
        element.set_attribute("Id", "7");
        assert_eq!(
            element.attributes,
            vec![
                ("Id".to_string(), "7".to_string()),
                ("Name".to_string(), "fat".to_string())
            ]
        );
    }
}
