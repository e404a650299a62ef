//! Batch results.

use std::path::{Path, PathBuf};

use annolayer_map::{MoveReport, Outcome, SynthesizedLayer};
use serde::Serialize;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// Written to the output folder (or would have been, in a dry run).
    Saved,
    /// Left alone; the batch continued.
    Skipped,
    /// Left alone; the batch ended here.
    Stopped,
    /// Could not be read or written.
    Failed,
    /// Nothing to change (swap only).
    Unchanged,
}

impl FileAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Skipped => "skipped",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
            Self::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub action: FileAction,
    /// Reorder classification; `None` for swaps and unreadable files.
    pub outcome: Option<Outcome>,
    pub original_layers: Vec<String>,
    pub final_layers: Vec<String>,
    pub synthesized: Vec<SynthesizedLayer>,
    pub moves: Vec<MoveReport>,
    /// Path written, when the file was saved outside a dry run.
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl FileReport {
    pub(crate) fn new(file: &Path, action: FileAction) -> Self {
        Self {
            file: file.to_path_buf(),
            action,
            outcome: None,
            original_layers: Vec::new(),
            final_layers: Vec::new(),
            synthesized: Vec::new(),
            moves: Vec::new(),
            output: None,
            error: None,
        }
    }

    pub(crate) fn failed(file: &Path, error: impl ToString) -> Self {
        let mut report = Self::new(file, FileAction::Failed);
        report.error = Some(error.to_string());
        report
    }

    /// File name for display.
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.display().to_string())
    }
}

/// Result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    /// Files discovered in the input folder.
    pub total: usize,
    pub files: Vec<FileReport>,
    /// The operator ended the batch before every file was processed.
    pub stopped: bool,
}

impl BatchReport {
    pub(crate) fn new(input_dir: &Path, output_dir: PathBuf, dry_run: bool, total: usize) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            output_dir,
            dry_run,
            total,
            files: Vec::new(),
            stopped: false,
        }
    }

    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| f.action == FileAction::Failed)
    }

    /// Files never reached because the batch stopped.
    pub fn unprocessed(&self) -> usize {
        self.total.saturating_sub(self.files.len())
    }

    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file_name() == name)
    }
}

/// Layer names of one file, for `annolayer layers`.
#[derive(Debug, Clone, Serialize)]
pub struct FileLayers {
    pub file: PathBuf,
    /// Layer names, or the error that prevented reading them.
    pub layers: Result<Vec<String>, String>,
}
