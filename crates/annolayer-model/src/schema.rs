//! Target schema: ordered slots with accepted alias names.

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::normalize::NameNormalizer;

/// One position in the target schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSlot {
    aliases: Vec<String>,
    canonical: String,
    keys: Vec<String>,
    normalizer: NameNormalizer,
}

impl SchemaSlot {
    /// Slot accepting `aliases`; the first alias becomes the canonical name.
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        let canonical = aliases.first().cloned().unwrap_or_default();
        Self {
            aliases,
            canonical,
            keys: Vec::new(),
            normalizer: NameNormalizer::default(),
        }
    }

    /// Override the name used when a placeholder layer is synthesized.
    ///
    /// The canonical name is accepted by the slot as well.
    #[must_use]
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = canonical.into();
        self
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Normalized alias keys (populated once the slot is part of a schema).
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// True if a layer named `name` belongs in this slot.
    ///
    /// Slots not yet compiled into a [`SchemaSpec`] accept nothing.
    pub fn accepts(&self, name: &str) -> bool {
        self.accepts_key(&self.normalizer.key(name))
    }

    /// Like [`Self::accepts`] for an already normalized key.
    pub fn accepts_key(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Human-readable label, e.g. `islet/islets`.
    pub fn label(&self) -> String {
        self.aliases.join("/")
    }

    fn compile(&mut self, normalizer: &NameNormalizer) {
        let mut keys: Vec<String> = Vec::with_capacity(self.aliases.len() + 1);
        let names = self
            .aliases
            .iter()
            .chain(std::iter::once(&self.canonical))
            .filter(|name| !name.is_empty());
        for name in names {
            let key = normalizer.key(name);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        self.keys = keys;
        self.normalizer = *normalizer;
    }
}

/// Ordered target schema compiled against a [`NameNormalizer`].
///
/// Immutable once built; shared read-only across a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSpec {
    slots: Vec<SchemaSlot>,
    normalizer: NameNormalizer,
}

impl SchemaSpec {
    /// Compile `slots` and check that no alias is claimed by two slots.
    pub fn new(mut slots: Vec<SchemaSlot>, normalizer: NameNormalizer) -> Result<Self, SchemaError> {
        if slots.is_empty() {
            return Err(SchemaError::Empty);
        }
        let mut owners: BTreeMap<String, usize> = BTreeMap::new();
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.aliases.iter().all(String::is_empty) {
                return Err(SchemaError::EmptySlot { index });
            }
            if slot.canonical.is_empty() {
                slot.canonical = slot
                    .aliases
                    .iter()
                    .find(|a| !a.is_empty())
                    .cloned()
                    .unwrap_or_default();
            }
            slot.compile(&normalizer);
            for key in &slot.keys {
                if let Some(&first) = owners.get(key) {
                    return Err(SchemaError::OverlappingAlias {
                        alias: key.clone(),
                        first,
                        second: index,
                    });
                }
                owners.insert(key.clone(), index);
            }
        }
        Ok(Self { slots, normalizer })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[SchemaSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&SchemaSlot> {
        self.slots.get(index)
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    /// Slot labels in schema order, for prompts and reports.
    pub fn labels(&self) -> Vec<String> {
        self.slots.iter().map(SchemaSlot::label).collect()
    }

    /// Index of the slot accepting `name`, if any.
    pub fn slot_for(&self, name: &str) -> Option<usize> {
        let key = self.normalizer.key(name);
        self.slots.iter().position(|slot| slot.accepts_key(&key))
    }
}
