//! Schema sources: JSON files, `--slot` arguments and built-in presets.

use std::path::Path;

use anyhow::{Context, Result, bail};
use annolayer_model::{NameNormalizer, SchemaConfig, SchemaSpec};
use tracing::debug;

/// A built-in schema.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    /// Alias lists; the first alias of each slot is its canonical name.
    pub slots: &'static [&'static [&'static str]],
}

pub const PRESETS: &[Preset] = &[Preset {
    name: "pancreas-panin",
    description: "15-layer pancreas tissue schema for PanIN grading",
    slots: &[
        &["islet", "islets"],
        &["duct", "ducts", "normal duct"],
        &["vasculature", "blood vessel"],
        &["fat"],
        &["acini"],
        &["ecm", "stroma"],
        &["whitespace"],
        &["LG Panin", "panin"],
        &["noise"],
        &["nerve", "nerves"],
        &["endo", "endothelium"],
        &["immune"],
        &["PDAC"],
        &["HG panin"],
        &["PanIN 2.5"],
    ],
}];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Preset {
    pub fn config(&self) -> SchemaConfig {
        SchemaConfig::from_alias_lists(self.slots.iter().map(|aliases| aliases.to_vec()))
    }
}

/// Where the target schema comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource<'a> {
    File(&'a Path),
    /// Comma-separated alias lists, one per slot.
    Slots(&'a [String]),
    Preset(&'a str),
}

/// Load and validate the schema from `source`.
pub fn load_schema(source: SchemaSource<'_>, normalizer: NameNormalizer) -> Result<SchemaSpec> {
    let config = match source {
        SchemaSource::File(path) => read_schema_file(path)?,
        SchemaSource::Slots(slots) => slots_config(slots)?,
        SchemaSource::Preset(name) => match find_preset(name) {
            Some(preset) => preset.config(),
            None => bail!(
                "unknown preset '{name}' (available: {})",
                PRESETS
                    .iter()
                    .map(|p| p.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        },
    };
    let schema = config
        .into_schema(normalizer)
        .context("invalid layer schema")?;
    debug!(slots = schema.len(), "loaded layer schema");
    Ok(schema)
}

fn read_schema_file(path: &Path) -> Result<SchemaConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read schema file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse schema file {}", path.display()))
}

fn slots_config(slots: &[String]) -> Result<SchemaConfig> {
    let mut lists = Vec::with_capacity(slots.len());
    for slot in slots {
        let aliases: Vec<String> = slot
            .split(',')
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
            .map(String::from)
            .collect();
        if aliases.is_empty() {
            bail!("--slot '{slot}' names no layer");
        }
        lists.push(aliases);
    }
    Ok(SchemaConfig::from_alias_lists(lists))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_is_valid_and_complete() {
        let preset = find_preset("Pancreas-PanIN").unwrap();
        let schema = preset.config().into_schema(NameNormalizer::default()).unwrap();
        assert_eq!(schema.len(), 15);
        assert_eq!(schema.slot_for("Blood Vessel"), Some(2));
        assert_eq!(schema.slot_for("panin 2.5"), Some(14));
    }

    #[test]
    fn slot_arguments_split_on_commas() {
        let slots = vec!["islet, islets".to_string(), "fat".to_string()];
        let schema = load_schema(SchemaSource::Slots(&slots), NameNormalizer::default()).unwrap();
        assert_eq!(schema.labels(), vec!["islet/islets", "fat"]);

        let empty = vec![" , ".to_string()];
        assert!(load_schema(SchemaSource::Slots(&empty), NameNormalizer::default()).is_err());
    }

    #[test]
    fn schema_file_accepts_wrapped_slots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{"slots": ["duct", {"aliases": ["ecm", "stroma"], "canonical": "stroma"}]}"#,
        )
        .unwrap();
        let schema = load_schema(SchemaSource::File(&path), NameNormalizer::default()).unwrap();
        assert_eq!(schema.slot(1).unwrap().canonical(), "stroma");
    }

    #[test]
    fn overlapping_aliases_are_rejected() {
        let slots = vec!["duct".to_string(), "ducts,DUCT".to_string()];
        let err = load_schema(SchemaSource::Slots(&slots), NameNormalizer::default()).unwrap_err();
        assert!(format!("{err:#}").contains("accepted by both slot 0 and slot 1"));
    }

    #[test]
    fn unknown_preset_lists_available() {
        let err = load_schema(SchemaSource::Preset("liver"), NameNormalizer::default()).unwrap_err();
        assert_eq!(err.to_string(), "unknown preset 'liver' (available: pancreas-panin)");
    }
}
