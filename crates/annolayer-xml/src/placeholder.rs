//! Empty `Annotation` elements for auto-filled layers.

use annolayer_map::PlaceholderPayload;
use annolayer_model::LayerId;

use crate::document::ANNOTATION_ELEMENT;
use crate::tree::XmlElement;

/// Outline colour for new layers (green, as BGR integer).
const PLACEHOLDER_LINE_COLOR: &str = "65280";
/// Freehand region layer type.
const PLACEHOLDER_TYPE: &str = "4";

impl PlaceholderPayload for XmlElement {
    fn placeholder(name: &str, id: LayerId) -> Self {
        let attribute = XmlElement::new("Attribute")
            .with_attribute("Name", name)
            .with_attribute("Id", "0")
            .with_attribute("Value", "");

        XmlElement::new(ANNOTATION_ELEMENT)
            .with_attribute("Id", id.to_string())
            .with_attribute("Name", name)
            .with_attribute("ReadOnly", "0")
            .with_attribute("NameReadOnly", "0")
            .with_attribute("LineColorReadOnly", "0")
            .with_attribute("Incremental", "0")
            .with_attribute("Type", PLACEHOLDER_TYPE)
            .with_attribute("LineColor", PLACEHOLDER_LINE_COLOR)
            .with_attribute("Visible", "1")
            .with_attribute("Selected", "0")
            .with_attribute("MarkupImagePath", "")
            .with_attribute("MacroName", "")
            .with_child(XmlElement::new("Attributes").with_child(attribute))
            .with_child(XmlElement::new("Regions").with_child(XmlElement::new("RegionAttributeHeaders")))
            .with_child(XmlElement::new("Plots"))
    }
}
