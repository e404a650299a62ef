//! Serializable schema configuration.
//!
//! Accepted shapes (JSON shown):
//!
//! ```json
//! [["islet", "islets"], "fat", {"aliases": ["ecm", "stroma"], "canonical": "ecm"}]
//! ```
//!
//! or the same list wrapped as `{"slots": [...]}`.

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::normalize::NameNormalizer;
use crate::schema::{SchemaSlot, SchemaSpec};

/// A schema as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaConfig {
    /// Bare list of slots.
    Slots(Vec<SlotConfig>),
    /// Object wrapping the slot list.
    Document { slots: Vec<SlotConfig> },
}

/// One slot as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotConfig {
    Name(String),
    Aliases(Vec<String>),
    Detailed {
        aliases: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        canonical: Option<String>,
    },
}

impl SlotConfig {
    fn into_slot(self) -> SchemaSlot {
        match self {
            Self::Name(name) => SchemaSlot::new([name]),
            Self::Aliases(aliases) => SchemaSlot::new(aliases),
            Self::Detailed { aliases, canonical } => {
                let slot = SchemaSlot::new(aliases);
                match canonical {
                    Some(canonical) => slot.with_canonical(canonical),
                    None => slot,
                }
            }
        }
    }
}

impl SchemaConfig {
    /// Build a config from alias lists, e.g. `--slot islet,islets` arguments.
    pub fn from_alias_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = Vec<S>>,
        S: Into<String>,
    {
        Self::Slots(
            lists
                .into_iter()
                .map(|aliases| SlotConfig::Aliases(aliases.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }

    pub fn slots(&self) -> &[SlotConfig] {
        match self {
            Self::Slots(slots) | Self::Document { slots } => slots,
        }
    }

    /// Compile into a [`SchemaSpec`] under `normalizer`.
    pub fn into_schema(self, normalizer: NameNormalizer) -> Result<SchemaSpec, SchemaError> {
        let slots = match self {
            Self::Slots(slots) | Self::Document { slots } => slots,
        };
        SchemaSpec::new(
            slots.into_iter().map(SlotConfig::into_slot).collect(),
            normalizer,
        )
    }
}
