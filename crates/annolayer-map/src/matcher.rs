//! Slot matching and reassembly.

use annolayer_model::{RecordSequence, SchemaSpec};
use tracing::{debug, trace};

use crate::error::{MapError, Result};

/// Assignment of one file's records to schema slots.
///
/// Positions refer to the record sequence the result was computed from.
/// Every position is either claimed by exactly one slot or listed once in
/// the leftovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    assignments: Vec<Option<usize>>,
    leftovers: Vec<usize>,
    input_len: usize,
}

impl MatchResult {
    /// Number of schema slots.
    pub fn slot_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of records in the matched sequence.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Record position claimed by `slot`, if any.
    pub fn assignment(&self, slot: usize) -> Option<usize> {
        self.assignments.get(slot).copied().flatten()
    }

    /// Per-slot record positions in schema order.
    pub fn assignments(&self) -> &[Option<usize>] {
        &self.assignments
    }

    /// Unclaimed record positions in original order.
    pub fn leftovers(&self) -> &[usize] {
        &self.leftovers
    }

    /// Slots with no matching record.
    pub fn missing_slots(&self) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter_map(|(slot, position)| position.is_none().then_some(slot))
            .collect()
    }

    /// Claimed record positions in slot order (absent slots skipped).
    pub fn claimed_positions(&self) -> Vec<usize> {
        self.assignments.iter().flatten().copied().collect()
    }

    pub fn claimed_count(&self) -> usize {
        self.assignments.iter().flatten().count()
    }

    /// True if every slot has a record.
    pub fn is_complete(&self) -> bool {
        self.assignments.iter().all(Option::is_some)
    }

    /// True if the claimed records already appear in slot order in the file.
    pub fn preserves_order(&self) -> bool {
        self.claimed_positions().windows(2).all(|w| w[0] < w[1])
    }

    /// Final positions: claimed records in slot order, then leftovers.
    pub fn reassembly_order(&self) -> Vec<usize> {
        let mut order = self.claimed_positions();
        order.extend_from_slice(&self.leftovers);
        order
    }
}

/// Match `records` against the slots of `schema`.
///
/// Slots are filled in schema order. Each slot takes the first record, in
/// file order, whose normalized name is one of its aliases and that no
/// earlier slot has claimed. Records nobody claims become leftovers.
pub fn match_layers<P>(records: &RecordSequence<P>, schema: &SchemaSpec) -> MatchResult {
    let normalizer = schema.normalizer();
    let keys: Vec<String> = records.iter().map(|r| normalizer.key(&r.name)).collect();
    let mut claimed = vec![false; keys.len()];
    let mut assignments = Vec::with_capacity(schema.len());

    for (slot_index, slot) in schema.slots().iter().enumerate() {
        let found = keys
            .iter()
            .enumerate()
            .find(|(position, key)| !claimed[*position] && slot.accepts_key(key))
            .map(|(position, _)| position);
        match found {
            Some(position) => {
                claimed[position] = true;
                trace!(
                    slot = slot_index,
                    position,
                    layer = %records.as_slice()[position].name,
                    "slot matched"
                );
            }
            None => debug!(slot = slot_index, expected = %slot.label(), "slot has no layer"),
        }
        assignments.push(found);
    }

    let leftovers: Vec<usize> = claimed
        .iter()
        .enumerate()
        .filter_map(|(position, taken)| (!taken).then_some(position))
        .collect();

    MatchResult {
        assignments,
        leftovers,
        input_len: keys.len(),
    }
}

/// Reassemble `records` per `result` without filling absent slots.
pub fn reorder<P: Clone>(
    records: &RecordSequence<P>,
    result: &MatchResult,
) -> Result<RecordSequence<P>> {
    check_input(records, result)?;
    records
        .permute(&result.reassembly_order())
        .ok_or(MapError::ResultMismatch {
            expected: result.input_len,
            actual: records.len(),
        })
}

pub(crate) fn check_input<P>(records: &RecordSequence<P>, result: &MatchResult) -> Result<()> {
    if records.len() != result.input_len {
        return Err(MapError::ResultMismatch {
            expected: result.input_len,
            actual: records.len(),
        });
    }
    Ok(())
}
