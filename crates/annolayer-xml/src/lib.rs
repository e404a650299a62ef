//! Annotation XML codec.
//!
//! Reads ImageScope-style annotation files:
//!
//! ```xml
//! <Annotations MicronsPerPixel="0.5">
//!   <Annotation Id="1" Name="islet" Visible="1">
//!     <Attributes/>
//!     <Regions>...</Regions>
//!     <Plots/>
//!   </Annotation>
//!   ...
//! </Annotations>
//! ```
//!
//! Each `Annotation` element becomes one layer [`Record`](annolayer_model::Record)
//! whose payload is the element itself, kept verbatim so that writing the
//! document back only changes layer order and indentation.
//!
//! # Example
//!
//! ```
//! use annolayer_xml::AnnotationDocument;
//!
//! let doc = AnnotationDocument::parse(
//!     r#"<Annotations><Annotation Id="1" Name="fat"/><Annotation Id="2" Name="duct"/></Annotations>"#,
//! )
//! .unwrap();
//! assert_eq!(doc.layers().names(), vec!["fat", "duct"]);
//! ```

#![deny(unsafe_code)]

mod document;
mod error;
mod placeholder;
mod tree;

pub use document::{
    ANNOTATION_ELEMENT, ROOT_ELEMENT, AnnotationDocument, read_annotations, write_annotations,
};
pub use error::{Result, XmlError};
pub use tree::{XmlDocument, XmlElement, XmlNode, parse_document, write_document};
