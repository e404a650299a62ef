//! Annotation list documents.

use std::fs;
use std::path::Path;

use annolayer_model::{LayerId, Record, RecordSequence};
use tracing::{debug, trace};

use crate::error::{Result, XmlError};
use crate::tree::{XmlDocument, XmlElement, XmlNode, parse_document, write_document};

/// Root element of an annotation file.
pub const ROOT_ELEMENT: &str = "Annotations";
/// Element holding one layer.
pub const ANNOTATION_ELEMENT: &str = "Annotation";

const NAME_ATTRIBUTE: &str = "Name";
const ID_ATTRIBUTE: &str = "Id";

/// A parsed annotation file split into its layers and everything around them.
///
/// Root children that are not `Annotation` elements are kept in place:
/// those before the first layer stay before the layers, the rest are
/// written after the last layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDocument {
    prolog: Vec<XmlNode>,
    root_name: String,
    root_attributes: Vec<(String, String)>,
    leading: Vec<XmlNode>,
    trailing: Vec<XmlNode>,
    layers: RecordSequence<XmlElement>,
}

impl AnnotationDocument {
    /// Parse annotation XML text.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_xml(parse_document(text)?)
    }

    /// Split a generic document into layers.
    pub fn from_xml(document: XmlDocument) -> Result<Self> {
        let XmlDocument { prolog, root } = document;
        if root.name != ROOT_ELEMENT {
            return Err(XmlError::UnexpectedRoot {
                expected: ROOT_ELEMENT,
                found: root.name,
            });
        }

        let mut leading = Vec::new();
        let mut trailing = Vec::new();
        let mut records = Vec::new();
        for node in root.children {
            match node {
                XmlNode::Element(element) if element.name == ANNOTATION_ELEMENT => {
                    records.push(layer_record(records.len(), element)?);
                }
                other if records.is_empty() => leading.push(other),
                other => trailing.push(other),
            }
        }
        let layers = RecordSequence::new(records)?;
        trace!(layers = layers.len(), "parsed annotation document");

        Ok(Self {
            prolog,
            root_name: root.name,
            root_attributes: root.attributes,
            leading,
            trailing,
            layers,
        })
    }

    pub fn layers(&self) -> &RecordSequence<XmlElement> {
        &self.layers
    }

    /// Attributes of the `Annotations` root, in document order.
    pub fn root_attributes(&self) -> &[(String, String)] {
        &self.root_attributes
    }

    /// Same document with `layers` in place of the current ones.
    #[must_use]
    pub fn with_layers(mut self, layers: RecordSequence<XmlElement>) -> Self {
        self.layers = layers;
        self
    }

    /// Rebuild the generic tree, layers in their current order.
    pub fn to_xml(&self) -> XmlDocument {
        let mut root = XmlElement::new(self.root_name.clone());
        root.attributes = self.root_attributes.clone();
        root.children.extend(self.leading.iter().cloned());
        root.children.extend(
            self.layers
                .iter()
                .map(|record| XmlNode::Element(record.payload.clone())),
        );
        root.children.extend(self.trailing.iter().cloned());
        XmlDocument {
            prolog: self.prolog.clone(),
            root,
        }
    }

    pub fn to_xml_string(&self) -> Result<String> {
        write_document(&self.to_xml())
    }
}

fn layer_record(index: usize, element: XmlElement) -> Result<Record<XmlElement>> {
    let name = element
        .attribute(NAME_ATTRIBUTE)
        .ok_or(XmlError::MissingAttribute {
            index,
            attribute: NAME_ATTRIBUTE,
        })?
        .to_string();
    let raw_id = element.attribute(ID_ATTRIBUTE).ok_or(XmlError::MissingAttribute {
        index,
        attribute: ID_ATTRIBUTE,
    })?;
    let id = raw_id
        .parse::<LayerId>()
        .map_err(|_| XmlError::InvalidId {
            name: name.clone(),
            value: raw_id.to_string(),
        })?;
    Ok(Record::new(name, id, element))
}

/// Read and parse the annotation file at `path`.
pub fn read_annotations(path: &Path) -> Result<AnnotationDocument> {
    let text = fs::read_to_string(path).map_err(|source| XmlError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document = AnnotationDocument::parse(&text).map_err(|e| e.in_file(path))?;
    debug!(path = %path.display(), layers = document.layers().len(), "read annotation file");
    Ok(document)
}

/// Serialize `document` to `path`, replacing any existing file.
pub fn write_annotations(path: &Path, document: &AnnotationDocument) -> Result<()> {
    let text = document.to_xml_string().map_err(|e| e.in_file(path))?;
    fs::write(path, text).map_err(|source| XmlError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), layers = document.layers().len(), "wrote annotation file");
    Ok(())
}
