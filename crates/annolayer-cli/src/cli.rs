//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "annolayer",
    version,
    about = "Put annotation layers into a canonical order",
    long_about = "Reorder the Annotation layers of ImageScope-style XML files so that\n\
                  every file in a folder follows the same layer schema.\n\n\
                  Reordered files are written to a separate output folder; the\n\
                  input files are never modified."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reorder layers to match a schema.
    Reorder(ReorderArgs),

    /// Move named layers to fixed positions.
    Swap(SwapArgs),

    /// List the layers of every file in a folder.
    Layers(LayersArgs),

    /// List built-in schemas.
    Presets,
}

/// Options shared by the commands that write files.
#[derive(Args)]
pub struct OutputArgs {
    /// Folder containing the annotation files.
    #[arg(value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Output folder (default depends on the command, inside DIR).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extension of the files to process.
    #[arg(long = "extension", value_name = "EXT", default_value = "xml")]
    pub extension: String,

    /// Match layer names case-sensitively.
    #[arg(long = "case-sensitive")]
    pub case_sensitive: bool,

    /// Classify and decide, but write nothing.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Also write the batch report as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
#[command(group(ArgGroup::new("schema_source").required(true)))]
pub struct ReorderArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// JSON schema file.
    #[arg(long = "schema", value_name = "FILE", group = "schema_source")]
    pub schema: Option<PathBuf>,

    /// One slot as comma-separated aliases; repeat in schema order.
    #[arg(long = "slot", value_name = "ALIASES", group = "schema_source")]
    pub slots: Vec<String>,

    /// Built-in schema name (see `annolayer presets`).
    #[arg(long = "preset", value_name = "NAME", group = "schema_source")]
    pub preset: Option<String>,

    /// Ignore leading and trailing whitespace in layer names.
    #[arg(long = "trim-names")]
    pub trim_names: bool,

    /// Add empty layers for schema slots missing from a file.
    #[arg(long = "fill-missing")]
    pub fill_missing: bool,

    /// Ask before continuing after a file gained layers (with --fill-missing).
    #[arg(long = "confirm-fill", requires = "fill_missing")]
    pub confirm_fill: bool,

    /// Never prompt; ambiguous files are handled by --on-mismatch / --on-extra.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,

    /// Answer for reordered or incomplete files (implies --non-interactive).
    #[arg(long = "on-mismatch", value_enum, value_name = "ACTION")]
    pub on_mismatch: Option<MismatchAction>,

    /// Answer for files with extra layers (implies --non-interactive).
    #[arg(long = "on-extra", value_enum, value_name = "ACTION")]
    pub on_extra: Option<ExtraAction>,
}

#[derive(Parser)]
pub struct SwapArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Layer to move; pair each with a --position.
    #[arg(long = "layer", value_name = "NAME", required = true)]
    pub layers: Vec<String>,

    /// Target index (0-based) for the matching --layer.
    #[arg(long = "position", value_name = "N", required = true)]
    pub positions: Vec<usize>,
}

#[derive(Parser)]
pub struct LayersArgs {
    /// Folder containing the annotation files.
    #[arg(value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Extension of the files to list.
    #[arg(long = "extension", value_name = "EXT", default_value = "xml")]
    pub extension: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MismatchAction {
    Continue,
    Stop,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExtraAction {
    Save,
    Skip,
    Stop,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
