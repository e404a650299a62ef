//! Layer records and per-file record sequences.

use std::collections::BTreeMap;

use crate::error::{ModelError, Result};
use crate::ids::LayerId;

/// One named layer read from an annotation file.
///
/// `payload` carries everything the codec needs to write the layer back
/// unchanged; the ordering logic never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<P> {
    pub name: String,
    pub id: LayerId,
    pub payload: P,
}

impl<P> Record<P> {
    pub fn new(name: impl Into<String>, id: LayerId, payload: P) -> Self {
        Self {
            name: name.into(),
            id,
            payload,
        }
    }
}

/// Ordered layers of one file.
///
/// Identifiers are unique within a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSequence<P> {
    records: Vec<Record<P>>,
}

impl<P> Default for RecordSequence<P> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<P> RecordSequence<P> {
    /// Build a sequence, rejecting duplicate identifiers.
    pub fn new(records: Vec<Record<P>>) -> Result<Self> {
        let mut seen: BTreeMap<LayerId, usize> = BTreeMap::new();
        for (position, record) in records.iter().enumerate() {
            if let Some(&first) = seen.get(&record.id) {
                return Err(ModelError::DuplicateLayerId {
                    id: record.id,
                    first: records[first].name.clone(),
                    second: record.name.clone(),
                });
            }
            seen.insert(record.id, position);
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<P>> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[Record<P>] {
        &self.records
    }

    /// Layer names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Identifiers in file order.
    pub fn ids(&self) -> Vec<LayerId> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Highest identifier in the file, if any.
    pub fn max_id(&self) -> Option<LayerId> {
        self.records.iter().map(|r| r.id).max()
    }

    /// New sequence holding the records at `order`, in that order.
    ///
    /// Returns `None` unless `order` is a permutation of `0..len`.
    pub fn permute(&self, order: &[usize]) -> Option<Self>
    where
        P: Clone,
    {
        if order.len() != self.records.len() {
            return None;
        }
        let mut seen = vec![false; order.len()];
        let mut records = Vec::with_capacity(order.len());
        for &position in order {
            let slot = seen.get_mut(position)?;
            if *slot {
                return None;
            }
            *slot = true;
            records.push(self.records[position].clone());
        }
        Some(Self { records })
    }
}

impl<'a, P> IntoIterator for &'a RecordSequence<P> {
    type Item = &'a Record<P>;
    type IntoIter = std::slice::Iter<'a, Record<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, id: u64) -> Record<()> {
        Record::new(name, LayerId::new(id), ())
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = RecordSequence::new(vec![record("duct", 1), record("fat", 1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "duplicate layer id 1 (layers 'duct' and 'fat')"
        );
    }

    #[test]
    fn max_id_ignores_order() {
        let seq = RecordSequence::new(vec![record("a", 4), record("b", 9), record("c", 2)]).unwrap();
        assert_eq!(seq.max_id(), Some(LayerId::new(9)));
        assert_eq!(seq.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn permute_requires_a_permutation() {
        let seq = RecordSequence::new(vec![record("a", 1), record("b", 2), record("c", 3)]).unwrap();
        let permuted = seq.permute(&[2, 0, 1]).unwrap();
        assert_eq!(permuted.names(), vec!["c", "a", "b"]);

        assert!(seq.permute(&[0, 1]).is_none());
        assert!(seq.permute(&[0, 0, 1]).is_none());
        assert!(seq.permute(&[0, 1, 3]).is_none());
    }

    #[test]
    fn sequences_compare_by_value() {
        fn assert_eq_impl<T: Eq>() {}
        assert_eq_impl::<RecordSequence<String>>();

        let left = RecordSequence::new(vec![record("a", 1)]).unwrap();
        let right = RecordSequence::new(vec![record("a", 1)]).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn empty_sequence_has_no_max_id() {
        let seq: RecordSequence<()> = RecordSequence::default();
        assert!(seq.is_empty());
        assert_eq!(seq.max_id(), None);
    }
}
