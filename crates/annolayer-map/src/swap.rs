//! Positional swap: move named layers to fixed indices.
//!
//! Each move takes the first layer with the given name out of the sequence
//! and reinserts it at the target index; the layers in between shift by one.
//! Moves apply in order, so later moves see the effect of earlier ones.

use annolayer_model::{ModelError, NameNormalizer, RecordSequence};
use serde::Serialize;
use tracing::debug;

use crate::error::{MapError, Result};

/// Move the layer called `name` to `position`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerMove {
    pub name: String,
    pub position: usize,
}

/// Pair up layer names with target positions.
pub fn moves_from_lists(
    names: &[String],
    positions: &[usize],
) -> std::result::Result<Vec<LayerMove>, ModelError> {
    if names.len() != positions.len() {
        return Err(ModelError::SwapLengthMismatch {
            names: names.len(),
            positions: positions.len(),
        });
    }
    Ok(names
        .iter()
        .zip(positions)
        .map(|(name, &position)| LayerMove {
            name: name.clone(),
            position,
        })
        .collect())
}

/// What happened to one requested move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum MoveStatus {
    Moved { from: usize, to: usize },
    InPlace { position: usize },
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub name: String,
    pub status: MoveStatus,
}

/// Output of [`swap_layers`].
#[derive(Debug, Clone, PartialEq)]
pub struct SwapResult<P> {
    pub sequence: RecordSequence<P>,
    pub moves: Vec<MoveReport>,
}

impl<P> SwapResult<P> {
    /// True if at least one layer changed position.
    pub fn modified(&self) -> bool {
        self.moves
            .iter()
            .any(|m| matches!(m.status, MoveStatus::Moved { .. }))
    }

    /// Names of requested layers that were not found.
    pub fn missing(&self) -> Vec<&str> {
        self.moves
            .iter()
            .filter(|m| m.status == MoveStatus::Missing)
            .map(|m| m.name.as_str())
            .collect()
    }
}

/// Apply `moves` to `records`, returning the rearranged copy.
///
/// Targets past the end are clamped to the last index.
pub fn swap_layers<P: Clone>(
    records: &RecordSequence<P>,
    moves: &[LayerMove],
    normalizer: &NameNormalizer,
) -> Result<SwapResult<P>> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    let source = records.as_slice();
    let mut reports = Vec::with_capacity(moves.len());

    for layer_move in moves {
        let key = normalizer.key(&layer_move.name);
        let found = order
            .iter()
            .position(|&p| normalizer.key(&source[p].name) == key);
        let status = match found {
            None => MoveStatus::Missing,
            Some(from) => {
                let to = layer_move.position.min(order.len() - 1);
                if from == to {
                    MoveStatus::InPlace { position: from }
                } else {
                    let taken = order.remove(from);
                    order.insert(to, taken);
                    MoveStatus::Moved { from, to }
                }
            }
        };
        debug!(layer = %layer_move.name, ?status, "swap move");
        reports.push(MoveReport {
            name: layer_move.name.clone(),
            status,
        });
    }

    let sequence = records
        .permute(&order)
        .ok_or(MapError::ResultMismatch {
            expected: order.len(),
            actual: records.len(),
        })?;
    Ok(SwapResult {
        sequence,
        moves: reports,
    })
}

#[cfg(test)]
mod tests {
    use annolayer_model::{LayerId, Record};

    use super::*;

    fn layers(names: &[&str]) -> RecordSequence<()> {
        RecordSequence::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Record::new(*n, LayerId::new(i as u64 + 1), ()))
                .collect(),
        )
        .unwrap()
    }

    fn mv(name: &str, position: usize) -> LayerMove {
        LayerMove {
            name: name.to_string(),
            position,
        }
    }

    #[test]
    fn moves_layers_and_shifts_the_rest() {
        let records = layers(&["islet", "duct", "fat", "stroma", "epithelium"]);
        let out = swap_layers(
            &records,
            &[mv("Stroma", 2), mv("Epithelium", 3)],
            &NameNormalizer::case_insensitive(),
        )
        .unwrap();

        assert_eq!(
            out.sequence.names(),
            vec!["islet", "duct", "stroma", "epithelium", "fat"]
        );
        assert_eq!(
            out.moves.iter().map(|m| m.status).collect::<Vec<_>>(),
            vec![
                MoveStatus::Moved { from: 3, to: 2 },
                MoveStatus::Moved { from: 4, to: 3 },
            ]
        );
        assert!(out.modified());
    }

    #[test]
    fn layer_already_in_place_is_not_a_modification() {
        let records = layers(&["islet", "duct", "stroma"]);
        let out = swap_layers(&records, &[mv("stroma", 2)], &NameNormalizer::case_sensitive())
            .unwrap();

        assert!(!out.modified());
        assert_eq!(out.moves[0].status, MoveStatus::InPlace { position: 2 });
        assert_eq!(out.sequence, records);
    }

    #[test]
    fn missing_and_case_sensitive() {
        let records = layers(&["islet", "Stroma"]);
        let out = swap_layers(&records, &[mv("stroma", 0)], &NameNormalizer::case_sensitive())
            .unwrap();
        assert_eq!(out.missing(), vec!["stroma"]);
        assert!(!out.modified());
    }

    #[test]
    fn target_past_end_clamps() {
        let records = layers(&["noise", "islet", "duct"]);
        let out = swap_layers(&records, &[mv("noise", 10)], &NameNormalizer::default()).unwrap();
        assert_eq!(out.sequence.names(), vec!["islet", "duct", "noise"]);
        assert_eq!(out.moves[0].status, MoveStatus::Moved { from: 0, to: 2 });
    }

    #[test]
    fn list_lengths_must_agree() {
        let names = vec!["stroma".to_string(), "epithelium".to_string()];
        let err = moves_from_lists(&names, &[2]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SwapLengthMismatch {
                names: 2,
                positions: 1
            }
        ));
        assert_eq!(moves_from_lists(&names, &[2, 3]).unwrap()[1], mv("epithelium", 3));
    }
}
