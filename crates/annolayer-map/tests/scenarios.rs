//! End-to-end matching scenarios on in-memory layers.

use annolayer_map::{
    Choice, DecisionError, DecisionProvider, FillMode, IdPool, NoticePolicy, Outcome, Prompt,
    PromptKind, Resolution, classify, match_layers, reorder, reorder_with_fill, resolve,
};
use annolayer_model::{LayerId, NameNormalizer, Record, RecordSequence, SchemaSlot, SchemaSpec};

struct Always(Choice);

impl DecisionProvider for Always {
    fn ask(&mut self, _prompt: &Prompt) -> Result<Choice, DecisionError> {
        Ok(self.0)
    }
}

fn duct_fat() -> SchemaSpec {
    SchemaSpec::new(
        vec![SchemaSlot::new(["duct"]), SchemaSlot::new(["fat"])],
        NameNormalizer::case_insensitive(),
    )
    .unwrap()
}

fn layers(layers: &[(&str, u64)]) -> RecordSequence<()> {
    RecordSequence::new(
        layers
            .iter()
            .map(|(name, id)| Record::new(*name, LayerId::new(*id), ()))
            .collect(),
    )
    .unwrap()
}

fn prompt(kind: PromptKind) -> Prompt {
    Prompt {
        kind,
        title: "Layer Order Mismatch".to_string(),
        message: String::new(),
        file: "case.xml".to_string(),
    }
}

#[test]
fn exact_match_keeps_order() {
    let schema = duct_fat();
    let records = layers(&[("duct", 1), ("fat", 2)]);
    let result = match_layers(&records, &schema);
    let outcome = classify(&records, &result, &schema, FillMode::Strict);

    assert_eq!(outcome, Outcome::ExactMatch);
    let resolution = resolve(
        outcome,
        false,
        NoticePolicy::Log,
        &mut Always(Choice::Stop),
        prompt,
    )
    .unwrap();
    assert_eq!(resolution, Resolution::Save);
    assert_eq!(reorder(&records, &result).unwrap(), records);
}

#[test]
fn reordered_file_declined_is_skipped() {
    let schema = duct_fat();
    let records = layers(&[("Fat", 1), ("Duct", 2)]);
    let result = match_layers(&records, &schema);
    let outcome = classify(&records, &result, &schema, FillMode::Strict);

    assert_eq!(outcome, Outcome::ReorderedMatch);
    let resolution = resolve(
        outcome,
        false,
        NoticePolicy::Log,
        &mut Always(Choice::Continue),
        prompt,
    )
    .unwrap();
    assert_eq!(resolution, Resolution::Skip);
}

#[test]
fn auto_fill_appends_placeholder_after_max_id() {
    let schema = duct_fat();
    let records = layers(&[("duct", 4)]);
    let result = match_layers(&records, &schema);
    let outcome = classify(&records, &result, &schema, FillMode::AutoFill);
    assert_eq!(outcome, Outcome::AutoFilled);

    let mut pool = IdPool::seeded_from(&records);
    let filled = reorder_with_fill(&records, &result, &schema, &mut pool).unwrap();
    assert_eq!(filled.sequence.names(), vec!["duct", "fat"]);
    assert_eq!(filled.sequence.ids(), vec![LayerId::new(4), LayerId::new(5)]);

    let resolution = resolve(
        outcome,
        records.len() != schema.len(),
        NoticePolicy::Log,
        &mut Always(Choice::Stop),
        prompt,
    )
    .unwrap();
    assert_eq!(resolution, Resolution::Save);
}

#[test]
fn extra_layers_go_last_and_can_be_skipped() {
    let schema = duct_fat();
    let records = layers(&[("duct", 1), ("fat", 2), ("noise", 3)]);
    let result = match_layers(&records, &schema);
    let outcome = classify(&records, &result, &schema, FillMode::Strict);

    assert_eq!(outcome, Outcome::ExtraLayers);
    assert_eq!(result.leftovers(), [2]);
    assert_eq!(
        reorder(&records, &result).unwrap().names(),
        vec!["duct", "fat", "noise"]
    );

    let resolution = resolve(
        outcome,
        true,
        NoticePolicy::Log,
        &mut Always(Choice::Skip),
        prompt,
    )
    .unwrap();
    assert!(!resolution.writes());
    assert!(!resolution.halts());
}
