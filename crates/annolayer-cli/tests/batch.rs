//! Batch runs over annotation folders on disk.

use std::fs;
use std::path::Path;

use annolayer_cli::pipeline::{
    ReorderRequest, SwapRequest, inspect_layers, run_reorder, run_swap,
};
use annolayer_cli::types::FileAction;
use annolayer_map::{
    Choice, DecisionError, DecisionProvider, FillMode, LayerMove, NoticePolicy, Outcome,
    PolicyDecisions, Prompt, PromptKind,
};
use annolayer_model::{NameNormalizer, SchemaSlot, SchemaSpec};
use annolayer_xml::read_annotations;

/// Answers from a fixed list and remembers what was asked.
struct Scripted {
    answers: Vec<Choice>,
    asked: Vec<(PromptKind, String)>,
}

impl Scripted {
    fn new(answers: &[Choice]) -> Self {
        Self {
            answers: answers.iter().rev().copied().collect(),
            asked: Vec::new(),
        }
    }
}

impl DecisionProvider for Scripted {
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError> {
        self.asked.push((prompt.kind, prompt.file.clone()));
        Ok(self.answers.pop().expect("unexpected prompt"))
    }
}

fn annotation_file(dir: &Path, name: &str, layers: &[(&str, u64)]) {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<Annotations MicronsPerPixel=\"0.25\">\n");
    for (layer, id) in layers {
        xml.push_str(&format!(
            "  <Annotation Id=\"{id}\" Name=\"{layer}\" LineColor=\"255\">\n    <Regions><Region Id=\"1\"/></Regions>\n  </Annotation>\n"
        ));
    }
    xml.push_str("</Annotations>\n");
    fs::write(dir.join(name), xml).expect("write annotation file");
}

fn duct_fat() -> SchemaSpec {
    SchemaSpec::new(
        vec![SchemaSlot::new(["duct"]), SchemaSlot::new(["fat"])],
        NameNormalizer::case_insensitive(),
    )
    .unwrap()
}

fn layer_names(path: &Path) -> Vec<String> {
    read_annotations(path)
        .expect("read output")
        .layers()
        .names()
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn exact_match_is_written_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "a.xml", &[("duct", 1), ("fat", 2)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let mut provider = Scripted::new(&[]);
    let report = run_reorder(&request, &mut provider).unwrap();

    let file = report.file("a.xml").unwrap();
    assert_eq!(file.outcome, Some(Outcome::ExactMatch));
    assert_eq!(file.action, FileAction::Saved);
    assert!(provider.asked.is_empty());
    let output = dir.path().join("reordered_xml").join("a.xml");
    assert_eq!(layer_names(&output), vec!["duct", "fat"]);
    assert_eq!(
        read_annotations(&output).unwrap(),
        read_annotations(&dir.path().join("a.xml")).unwrap()
    );
}

#[test]
fn reordered_file_is_never_written() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "b.xml", &[("Fat", 1), ("Duct", 2)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let mut provider = Scripted::new(&[Choice::Continue]);
    let report = run_reorder(&request, &mut provider).unwrap();

    assert_eq!(provider.asked, vec![(PromptKind::YesNo, "b.xml".to_string())]);
    let file = report.file("b.xml").unwrap();
    assert_eq!(file.outcome, Some(Outcome::ReorderedMatch));
    assert_eq!(file.action, FileAction::Skipped);
    assert!(!dir.path().join("reordered_xml").join("b.xml").exists());
    assert!(!report.stopped);
}

#[test]
fn auto_fill_saves_and_rerun_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "c.xml", &[("duct", 4)]);

    let mut request = ReorderRequest::new(dir.path(), duct_fat());
    request.fill = FillMode::AutoFill;
    let mut provider = Scripted::new(&[]);
    let report = run_reorder(&request, &mut provider).unwrap();

    let file = report.file("c.xml").unwrap();
    assert_eq!(file.outcome, Some(Outcome::AutoFilled));
    assert_eq!(file.action, FileAction::Saved);
    assert_eq!(file.synthesized.len(), 1);
    assert!(provider.asked.is_empty());

    let output_dir = dir.path().join("reordered_xml");
    let output = output_dir.join("c.xml");
    let written = read_annotations(&output).unwrap();
    assert_eq!(written.layers().names(), vec!["duct", "fat"]);
    assert_eq!(written.layers().as_slice()[1].id.get(), 5);

    let mut rerun = ReorderRequest::new(&output_dir, duct_fat());
    rerun.fill = FillMode::AutoFill;
    rerun.dry_run = true;
    let report = run_reorder(&rerun, &mut provider).unwrap();
    assert_eq!(report.file("c.xml").unwrap().outcome, Some(Outcome::ExactMatch));
    assert!(report.file("c.xml").unwrap().synthesized.is_empty());
}

#[test]
fn fill_notice_can_stop_after_saving() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "img1.xml", &[("duct", 1)]);
    annotation_file(dir.path(), "img2.xml", &[("duct", 1), ("fat", 2)]);

    let mut request = ReorderRequest::new(dir.path(), duct_fat());
    request.fill = FillMode::AutoFill;
    request.notice = NoticePolicy::Prompt;
    let mut provider = Scripted::new(&[Choice::Stop]);
    let report = run_reorder(&request, &mut provider).unwrap();

    assert!(report.stopped);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.unprocessed(), 1);
    assert_eq!(report.files[0].action, FileAction::Saved);
    assert!(dir.path().join("reordered_xml").join("img1.xml").exists());
}

#[test]
fn extra_layers_skip_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "d.xml", &[("duct", 1), ("fat", 2), ("noise", 3)]);
    annotation_file(dir.path(), "e.xml", &[("noise", 1), ("fat", 2), ("duct", 3)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let mut provider = Scripted::new(&[Choice::Skip, Choice::Save]);
    let report = run_reorder(&request, &mut provider).unwrap();

    let skipped = report.file("d.xml").unwrap();
    assert_eq!(skipped.outcome, Some(Outcome::ExtraLayers));
    assert_eq!(skipped.action, FileAction::Skipped);
    assert_eq!(skipped.final_layers, vec!["duct", "fat", "noise"]);
    assert!(!dir.path().join("reordered_xml").join("d.xml").exists());

    let saved = dir.path().join("reordered_xml").join("e.xml");
    assert_eq!(layer_names(&saved), vec!["duct", "fat", "noise"]);
}

#[test]
fn stop_halts_remaining_files_in_natural_order() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "img10.xml", &[("duct", 1), ("fat", 2)]);
    annotation_file(dir.path(), "img2.xml", &[("fat", 1), ("duct", 2)]);
    annotation_file(dir.path(), "img1.xml", &[("duct", 1), ("fat", 2)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let mut provider = PolicyDecisions::halt_on_ambiguity();
    let report = run_reorder(&request, &mut provider).unwrap();

    let order: Vec<String> = report.files.iter().map(|f| f.file_name()).collect();
    assert_eq!(order, vec!["img1.xml", "img2.xml"]);
    assert_eq!(report.files[1].action, FileAction::Stopped);
    assert!(report.stopped);
    assert!(!report.has_failures());
    assert!(!dir.path().join("reordered_xml").join("img10.xml").exists());
}

#[test]
fn unreadable_file_fails_without_ending_batch() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.xml"), "<Annotations><Annotation Name=\"duct\"/>").unwrap();
    annotation_file(dir.path(), "b.xml", &[("duct", 1), ("fat", 2)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let report = run_reorder(&request, &mut Scripted::new(&[])).unwrap();

    assert_eq!(report.files[0].action, FileAction::Failed);
    assert!(report.files[0].error.is_some());
    assert_eq!(report.files[1].action, FileAction::Saved);
    assert!(report.has_failures());
}

#[test]
fn dry_run_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "a.xml", &[("duct", 1), ("fat", 2)]);

    let mut request = ReorderRequest::new(dir.path(), duct_fat());
    request.dry_run = true;
    let report = run_reorder(&request, &mut Scripted::new(&[])).unwrap();

    assert_eq!(report.files[0].action, FileAction::Saved);
    assert!(report.files[0].output.is_none());
    assert!(!dir.path().join("reordered_xml").exists());
}

#[test]
fn invalid_answer_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "a.xml", &[("fat", 1), ("duct", 2)]);

    let request = ReorderRequest::new(dir.path(), duct_fat());
    let err = run_reorder(&request, &mut Scripted::new(&[Choice::Save])).unwrap_err();
    assert!(format!("{err:#}").contains("not a valid answer"));
}

#[test]
fn swap_moves_layers_into_new_folder() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(
        dir.path(),
        "a.xml",
        &[("islet", 1), ("duct", 2), ("Stroma", 3), ("epithelium", 4)],
    );
    annotation_file(dir.path(), "b.xml", &[("islet", 1), ("stroma", 2)]);

    let moves = vec![
        LayerMove {
            name: "stroma".to_string(),
            position: 0,
        },
        LayerMove {
            name: "epithelium".to_string(),
            position: 1,
        },
    ];
    let report = run_swap(&SwapRequest::new(dir.path(), moves)).unwrap();

    let output_dir = dir.path().join("new xml");
    assert_eq!(
        layer_names(&output_dir.join("a.xml")),
        vec!["Stroma", "epithelium", "islet", "duct"]
    );
    let b = report.file("b.xml").unwrap();
    assert_eq!(b.action, FileAction::Saved);
    assert_eq!(b.final_layers, vec!["stroma", "islet"]);
}

#[test]
fn swap_without_moves_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "a.xml", &[("stroma", 1), ("islet", 2)]);

    let moves = vec![LayerMove {
        name: "stroma".to_string(),
        position: 0,
    }];
    let report = run_swap(&SwapRequest::new(dir.path(), moves)).unwrap();

    assert_eq!(report.files[0].action, FileAction::Unchanged);
    assert!(!dir.path().join("new xml").join("a.xml").exists());
}

#[test]
fn inspect_lists_layers_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    annotation_file(dir.path(), "a.xml", &[("duct", 1), ("fat", 2)]);
    fs::write(dir.path().join("b.xml"), "<Layers/>").unwrap();

    let files = inspect_layers(dir.path(), "xml").unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].layers.as_ref().unwrap(), &vec!["duct", "fat"]);
    assert!(files[1].layers.is_err());
}
