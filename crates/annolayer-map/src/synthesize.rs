//! Placeholder layers for schema slots with no match.

use annolayer_model::{LayerId, ModelError, Record, RecordSequence, SchemaSpec};
use serde::Serialize;
use tracing::debug;

use crate::error::{MapError, Result};
use crate::matcher::{MatchResult, check_input};

/// Payloads that can stand in for a layer that did not exist in the file.
pub trait PlaceholderPayload: Sized {
    /// Minimal payload for an empty, visible layer.
    fn placeholder(name: &str, id: LayerId) -> Self;
}

impl PlaceholderPayload for () {
    fn placeholder(_name: &str, _id: LayerId) -> Self {}
}

/// Per-file source of fresh layer identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPool {
    /// Highest identifier already in use.
    last: Option<LayerId>,
}

impl IdPool {
    /// Pool starting after the highest identifier in `records`, or at 1.
    pub fn seeded_from<P>(records: &RecordSequence<P>) -> Self {
        Self {
            last: records.max_id(),
        }
    }

    /// Identifier the next allocation will return, if one is left.
    pub fn peek(&self) -> Option<LayerId> {
        match self.last {
            Some(last) => last.checked_next(),
            None => Some(LayerId::new(1)),
        }
    }

    pub fn allocate(&mut self) -> Result<LayerId> {
        let id = match self.last {
            Some(last) => last
                .checked_next()
                .ok_or(ModelError::LayerIdExhausted { last })?,
            None => LayerId::new(1),
        };
        self.last = Some(id);
        Ok(id)
    }
}

/// Build a placeholder record for `slot_index`.
pub fn synthesize<P: PlaceholderPayload>(
    slot_index: usize,
    canonical_name: &str,
    pool: &mut IdPool,
) -> Result<Record<P>> {
    let id = pool.allocate()?;
    debug!(slot = slot_index, layer = canonical_name, %id, "synthesized placeholder layer");
    Ok(Record::new(canonical_name, id, P::placeholder(canonical_name, id)))
}

/// A placeholder created during reassembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedLayer {
    pub slot: usize,
    pub name: String,
    pub id: LayerId,
}

/// Output of [`reorder_with_fill`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reassembled<P> {
    pub sequence: RecordSequence<P>,
    pub synthesized: Vec<SynthesizedLayer>,
}

/// Reassemble `records` per `result`, synthesizing a placeholder for each
/// absent slot from `pool`.
///
/// Identifiers are handed out in slot order.
pub fn reorder_with_fill<P: Clone + PlaceholderPayload>(
    records: &RecordSequence<P>,
    result: &MatchResult,
    schema: &SchemaSpec,
    pool: &mut IdPool,
) -> Result<Reassembled<P>> {
    check_input(records, result)?;
    if result.slot_count() != schema.len() {
        return Err(MapError::ResultMismatch {
            expected: schema.len(),
            actual: result.slot_count(),
        });
    }

    let source = records.as_slice();
    let mut ordered = Vec::with_capacity(schema.len() + result.leftovers().len());
    let mut synthesized = Vec::new();
    for (slot_index, (slot, assignment)) in schema
        .slots()
        .iter()
        .zip(result.assignments())
        .enumerate()
    {
        match assignment {
            Some(position) => ordered.push(source[*position].clone()),
            None => {
                let record: Record<P> = synthesize(slot_index, slot.canonical(), pool)?;
                synthesized.push(SynthesizedLayer {
                    slot: slot_index,
                    name: record.name.clone(),
                    id: record.id,
                });
                ordered.push(record);
            }
        }
    }
    ordered.extend(result.leftovers().iter().map(|&p| source[p].clone()));

    Ok(Reassembled {
        sequence: RecordSequence::new(ordered)?,
        synthesized,
    })
}
