//! Batch runners for the reorder and swap commands.
//!
//! Files are processed one at a time in natural order. A file that cannot be
//! read or written is recorded as failed and the batch moves on; schema,
//! discovery and decision-provider errors end the batch.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use annolayer_ingest::{ensure_output_dir, list_annotation_files};
use annolayer_map::{
    DecisionProvider, FillMode, IdPool, LayerMove, MatchResult, NoticePolicy, Outcome, Reassembled,
    classify, match_layers, reorder, reorder_with_fill, resolve, swap_layers,
};
use annolayer_model::{NameNormalizer, RecordSequence, SchemaSpec};
use annolayer_xml::{AnnotationDocument, XmlElement, read_annotations, write_annotations};
use tracing::{debug, info, info_span, warn};

use crate::prompt::{PromptContext, build_prompt};
use crate::types::{BatchReport, FileAction, FileLayers, FileReport};

/// Default input file extension.
pub const DEFAULT_EXTENSION: &str = "xml";
/// Output folder created inside the input folder by `reorder`.
pub const REORDER_OUTPUT_DIR: &str = "reordered_xml";
/// Output folder created inside the input folder by `swap`.
pub const SWAP_OUTPUT_DIR: &str = "new xml";

/// Parameters of a reorder batch.
#[derive(Debug, Clone)]
pub struct ReorderRequest {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/reordered_xml`.
    pub output_dir: Option<PathBuf>,
    pub extension: String,
    pub schema: SchemaSpec,
    pub fill: FillMode,
    pub notice: NoticePolicy,
    pub dry_run: bool,
}

impl ReorderRequest {
    pub fn new(input_dir: impl Into<PathBuf>, schema: SchemaSpec) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            schema,
            fill: FillMode::default(),
            notice: NoticePolicy::default(),
            dry_run: false,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        resolve_output_dir(&self.input_dir, self.output_dir.as_deref(), REORDER_OUTPUT_DIR)
    }
}

/// Parameters of a swap batch.
#[derive(Debug, Clone)]
pub struct SwapRequest {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/new xml`.
    pub output_dir: Option<PathBuf>,
    pub extension: String,
    pub moves: Vec<LayerMove>,
    pub normalizer: NameNormalizer,
    pub dry_run: bool,
}

impl SwapRequest {
    pub fn new(input_dir: impl Into<PathBuf>, moves: Vec<LayerMove>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            extension: DEFAULT_EXTENSION.to_string(),
            moves,
            normalizer: NameNormalizer::case_insensitive(),
            dry_run: false,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        resolve_output_dir(&self.input_dir, self.output_dir.as_deref(), SWAP_OUTPUT_DIR)
    }
}

fn resolve_output_dir(input_dir: &Path, explicit: Option<&Path>, default: &str) -> PathBuf {
    explicit.map_or_else(|| input_dir.join(default), Path::to_path_buf)
}

/// Reorder every annotation file in the request's input folder.
pub fn run_reorder(
    request: &ReorderRequest,
    provider: &mut dyn DecisionProvider,
) -> Result<BatchReport> {
    let files = list_annotation_files(&request.input_dir, &request.extension)
        .context("discover annotation files")?;
    let output_dir = request.output_dir();
    if !request.dry_run {
        ensure_output_dir(&output_dir).context("prepare output directory")?;
    }
    let mut report = BatchReport::new(
        &request.input_dir,
        output_dir.clone(),
        request.dry_run,
        files.len(),
    );
    info!(
        files = files.len(),
        slots = request.schema.len(),
        output = %output_dir.display(),
        dry_run = request.dry_run,
        "starting reorder batch"
    );

    for (index, path) in files.iter().enumerate() {
        let span = info_span!("file", file = %display_name(path), n = index + 1, of = files.len());
        let _guard = span.enter();
        info!("processing file");

        let document = match read_annotations(path) {
            Ok(document) => document,
            Err(error) => {
                warn!(%error, "failed to read annotation file");
                report.files.push(FileReport::failed(path, &error));
                continue;
            }
        };

        let (file_report, halt) = reorder_file(request, provider, path, document, &output_dir)?;
        report.files.push(file_report);
        if halt {
            info!("execution stopped by operator");
            report.stopped = true;
            break;
        }
    }

    Ok(report)
}

/// Process one parsed file. Returns its report and whether the batch halts.
fn reorder_file(
    request: &ReorderRequest,
    provider: &mut dyn DecisionProvider,
    path: &Path,
    document: AnnotationDocument,
    output_dir: &Path,
) -> Result<(FileReport, bool)> {
    let schema = &request.schema;
    let records = document.layers();
    let result = match_layers(records, schema);
    let outcome = classify(records, &result, schema, request.fill);
    debug!(%outcome, leftovers = result.leftovers().len(), "classified");

    let reassembled = match reassemble(records, &result, schema, outcome) {
        Ok(reassembled) => reassembled,
        Err(error) => return Ok((FileReport::failed(path, error), false)),
    };

    let file_name = display_name(path);
    let context = PromptContext {
        file: &file_name,
        outcome,
        targets: schema.labels(),
        original: records.names(),
        processed: result
            .assignments()
            .iter()
            .map(|position| position.map(|p| records.as_slice()[p].name.as_str()))
            .collect(),
        final_order: reassembled.sequence.names(),
    };
    let resolution = resolve(
        outcome,
        records.len() != schema.len(),
        request.notice,
        provider,
        |kind| build_prompt(kind, &context),
    )
    .with_context(|| format!("decision for {file_name}"))?;

    let mut file_report = FileReport::new(path, FileAction::Skipped);
    file_report.outcome = Some(outcome);
    file_report.original_layers = owned(&context.original);
    file_report.final_layers = owned(&context.final_order);
    file_report.synthesized = reassembled.synthesized.clone();

    if outcome == Outcome::AutoFilled {
        for layer in &reassembled.synthesized {
            warn!(layer = %layer.name, id = %layer.id, slot = layer.slot, "added missing layer");
        }
    }

    if resolution.writes() {
        let target = output_dir.join(path.file_name().unwrap_or(path.as_os_str()));
        let updated = document.with_layers(reassembled.sequence);
        file_report.action = FileAction::Saved;
        if request.dry_run {
            info!(output = %target.display(), "dry run: not writing");
        } else if let Err(error) = write_annotations(&target, &updated) {
            warn!(%error, "failed to write annotation file");
            file_report.action = FileAction::Failed;
            file_report.error = Some(error.to_string());
        } else {
            info!(output = %target.display(), "processed successfully");
            file_report.output = Some(target);
        }
    } else if resolution.halts() {
        file_report.action = FileAction::Stopped;
    } else {
        info!(%outcome, "skipped");
    }

    Ok((file_report, resolution.halts()))
}

fn reassemble(
    records: &RecordSequence<XmlElement>,
    result: &MatchResult,
    schema: &SchemaSpec,
    outcome: Outcome,
) -> annolayer_map::Result<Reassembled<XmlElement>> {
    if outcome == Outcome::AutoFilled {
        let mut pool = IdPool::seeded_from(records);
        return reorder_with_fill(records, result, schema, &mut pool);
    }
    Ok(Reassembled {
        sequence: reorder(records, result)?,
        synthesized: Vec::new(),
    })
}

/// Move named layers to fixed positions in every file of the input folder.
pub fn run_swap(request: &SwapRequest) -> Result<BatchReport> {
    let files = list_annotation_files(&request.input_dir, &request.extension)
        .context("discover annotation files")?;
    let output_dir = request.output_dir();
    if !request.dry_run {
        ensure_output_dir(&output_dir).context("prepare output directory")?;
    }
    let mut report = BatchReport::new(
        &request.input_dir,
        output_dir.clone(),
        request.dry_run,
        files.len(),
    );
    info!(files = files.len(), moves = request.moves.len(), "starting swap batch");

    for (index, path) in files.iter().enumerate() {
        let span = info_span!("file", file = %display_name(path), n = index + 1, of = files.len());
        let _guard = span.enter();

        let document = match read_annotations(path) {
            Ok(document) => document,
            Err(error) => {
                warn!(%error, "failed to read annotation file");
                report.files.push(FileReport::failed(path, &error));
                continue;
            }
        };
        let swapped = match swap_layers(document.layers(), &request.moves, &request.normalizer) {
            Ok(swapped) => swapped,
            Err(error) => {
                report.files.push(FileReport::failed(path, error));
                continue;
            }
        };
        for name in swapped.missing() {
            warn!(layer = name, "layer not found");
        }

        let mut file_report = FileReport::new(path, FileAction::Unchanged);
        file_report.original_layers = owned(&document.layers().names());
        file_report.final_layers = owned(&swapped.sequence.names());
        file_report.moves = swapped.moves.clone();

        if swapped.modified() {
            let target = output_dir.join(path.file_name().unwrap_or(path.as_os_str()));
            file_report.action = FileAction::Saved;
            if request.dry_run {
                info!(output = %target.display(), "dry run: not writing");
            } else {
                let updated = document.with_layers(swapped.sequence);
                match write_annotations(&target, &updated) {
                    Ok(()) => {
                        info!(output = %target.display(), "modified successfully");
                        file_report.output = Some(target);
                    }
                    Err(error) => {
                        warn!(%error, "failed to write annotation file");
                        file_report.action = FileAction::Failed;
                        file_report.error = Some(error.to_string());
                    }
                }
            }
        } else {
            info!("no layer moved");
        }
        report.files.push(file_report);
    }

    Ok(report)
}

/// Layer names of every annotation file in `dir`. Unreadable files carry
/// their error instead.
pub fn inspect_layers(dir: &Path, extension: &str) -> Result<Vec<FileLayers>> {
    let files = list_annotation_files(dir, extension).context("discover annotation files")?;
    Ok(files
        .into_iter()
        .map(|file| {
            let layers = read_annotations(&file)
                .map(|document| owned(&document.layers().names()))
                .map_err(|error| error.to_string());
            FileLayers { file, layers }
        })
        .collect())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
