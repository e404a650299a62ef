//! Outcome classification for a matched file.

use std::fmt;

use annolayer_model::{RecordSequence, SchemaSpec};
use serde::{Deserialize, Serialize};

use crate::matcher::MatchResult;

/// What to do with schema slots that have no layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// Report the file as [`Outcome::TooFew`] and ask the operator.
    #[default]
    Strict,
    /// Synthesize placeholders and save.
    AutoFill,
}

/// Classification of one file against the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every slot matched, same count, already in schema order.
    ExactMatch,
    /// Every slot matched, same count, different order.
    ReorderedMatch,
    /// At least one slot unmatched (strict mode).
    TooFew,
    /// Every slot matched and the file has extra layers.
    ExtraLayers,
    /// At least one slot unmatched and filled with a placeholder.
    AutoFilled,
}

/// How an outcome is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Write without asking.
    AutoSave,
    /// Yes/no prompt; the file is never written.
    Confirm,
    /// Save, skip, or stop.
    Choose,
    /// Write, telling the operator when the layer count changed.
    SaveWithNotice,
}

impl Outcome {
    pub fn policy(self) -> Policy {
        match self {
            Self::ExactMatch => Policy::AutoSave,
            Self::ReorderedMatch | Self::TooFew => Policy::Confirm,
            Self::ExtraLayers => Policy::Choose,
            Self::AutoFilled => Policy::SaveWithNotice,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact match",
            Self::ReorderedMatch => "reordered",
            Self::TooFew => "too few layers",
            Self::ExtraLayers => "extra layers",
            Self::AutoFilled => "auto-filled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a match of `original` against `schema`.
///
/// Precedence: missing slots (TooFew / AutoFilled), then extra layers, then
/// ordering.
pub fn classify<P>(
    original: &RecordSequence<P>,
    result: &MatchResult,
    schema: &SchemaSpec,
    fill: FillMode,
) -> Outcome {
    let expected = schema.len();
    if !result.is_complete() {
        return match fill {
            FillMode::Strict => Outcome::TooFew,
            FillMode::AutoFill => Outcome::AutoFilled,
        };
    }
    // A complete match claims one distinct record per slot, so the file
    // cannot be shorter than the schema here.
    if original.len() > expected {
        return Outcome::ExtraLayers;
    }
    if result.preserves_order() {
        Outcome::ExactMatch
    } else {
        Outcome::ReorderedMatch
    }
}

#[cfg(test)]
mod tests {
    use annolayer_model::{LayerId, NameNormalizer, Record, SchemaSlot};

    use super::*;
    use crate::matcher::match_layers;

    fn duct_fat() -> SchemaSpec {
        SchemaSpec::new(
            vec![SchemaSlot::new(["duct"]), SchemaSlot::new(["fat"])],
            NameNormalizer::case_insensitive(),
        )
        .unwrap()
    }

    fn outcome(names: &[&str], fill: FillMode) -> Outcome {
        let schema = duct_fat();
        let records = RecordSequence::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Record::new(*n, LayerId::new(i as u64 + 1), ()))
                .collect(),
        )
        .unwrap();
        let result = match_layers(&records, &schema);
        classify(&records, &result, &schema, fill)
    }

    #[test]
    fn exact_match() {
        assert_eq!(outcome(&["duct", "fat"], FillMode::Strict), Outcome::ExactMatch);
        assert_eq!(outcome(&["DUCT", "Fat"], FillMode::AutoFill), Outcome::ExactMatch);
    }

    #[test]
    fn reordered_match() {
        assert_eq!(outcome(&["Fat", "Duct"], FillMode::Strict), Outcome::ReorderedMatch);
    }

    #[test]
    fn extra_layers_regardless_of_order() {
        assert_eq!(outcome(&["duct", "fat", "noise"], FillMode::Strict), Outcome::ExtraLayers);
        assert_eq!(outcome(&["noise", "fat", "duct"], FillMode::Strict), Outcome::ExtraLayers);
    }

    #[test]
    fn missing_slot_wins_over_extra_layers() {
        assert_eq!(outcome(&["duct", "noise"], FillMode::Strict), Outcome::TooFew);
        assert_eq!(outcome(&["duct", "noise"], FillMode::AutoFill), Outcome::AutoFilled);
        assert_eq!(outcome(&[], FillMode::Strict), Outcome::TooFew);
    }

    #[test]
    fn policies() {
        assert_eq!(Outcome::ExactMatch.policy(), Policy::AutoSave);
        assert_eq!(Outcome::ReorderedMatch.policy(), Policy::Confirm);
        assert_eq!(Outcome::TooFew.policy(), Policy::Confirm);
        assert_eq!(Outcome::ExtraLayers.policy(), Policy::Choose);
        assert_eq!(Outcome::AutoFilled.policy(), Policy::SaveWithNotice);
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Outcome::ReorderedMatch).unwrap();
        assert_eq!(json, "\"reordered_match\"");
    }
}
