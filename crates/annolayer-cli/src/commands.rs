use std::io::{self, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use annolayer_cli::pipeline::{ReorderRequest, SwapRequest, inspect_layers, run_reorder, run_swap};
use annolayer_cli::prompt::TerminalPrompt;
use annolayer_cli::schema::{PRESETS, SchemaSource, load_schema};
use annolayer_cli::types::BatchReport;
use annolayer_map::{Choice, DecisionProvider, FillMode, NoticePolicy, PolicyDecisions, moves_from_lists};
use annolayer_model::NameNormalizer;

use crate::cli::{ExtraAction, LayersArgs, MismatchAction, ReorderArgs, SwapArgs};
use crate::summary::{print_layers, print_presets};

pub fn run_reorder_command(args: &ReorderArgs) -> Result<BatchReport> {
    let span = info_span!("reorder", dir = %args.output.input_dir.display());
    let _guard = span.enter();

    let normalizer = normalizer(args.output.case_sensitive).with_trim_whitespace(args.trim_names);
    let source = if let Some(path) = &args.schema {
        SchemaSource::File(path)
    } else if let Some(name) = &args.preset {
        SchemaSource::Preset(name)
    } else {
        SchemaSource::Slots(&args.slots)
    };
    let schema = load_schema(source, normalizer)?;

    let mut request = ReorderRequest::new(&args.output.input_dir, schema);
    request.output_dir = args.output.output_dir.clone();
    request.extension = args.output.extension.clone();
    request.dry_run = args.output.dry_run;
    if args.fill_missing {
        request.fill = FillMode::AutoFill;
    }
    if args.confirm_fill {
        request.notice = NoticePolicy::Prompt;
    }

    let mut provider = decision_provider(args)?;
    let report = run_reorder(&request, provider.as_mut())?;
    write_report(args.output.report.as_deref(), &report)?;
    Ok(report)
}

/// Terminal prompts when interactive, otherwise fixed answers.
fn decision_provider(args: &ReorderArgs) -> Result<Box<dyn DecisionProvider>> {
    let scripted = args.on_mismatch.is_some() || args.on_extra.is_some();
    if !scripted && !args.non_interactive && io::stdin().is_terminal() {
        return Ok(Box::new(TerminalPrompt::stdio()));
    }
    if !scripted {
        info!("non-interactive run: stopping at the first ambiguous file");
        return Ok(Box::new(PolicyDecisions::halt_on_ambiguity()));
    }
    let yes_no = match args.on_mismatch.unwrap_or(MismatchAction::Stop) {
        MismatchAction::Continue => Choice::Continue,
        MismatchAction::Stop => Choice::Stop,
    };
    let three_way = match args.on_extra.unwrap_or(ExtraAction::Stop) {
        ExtraAction::Save => Choice::Save,
        ExtraAction::Skip => Choice::Skip,
        ExtraAction::Stop => Choice::Stop,
    };
    Ok(Box::new(PolicyDecisions::new(yes_no, three_way)?))
}

pub fn run_swap_command(args: &SwapArgs) -> Result<BatchReport> {
    let span = info_span!("swap", dir = %args.output.input_dir.display());
    let _guard = span.enter();

    let moves = moves_from_lists(&args.layers, &args.positions).context("invalid swap arguments")?;
    let mut request = SwapRequest::new(&args.output.input_dir, moves);
    request.output_dir = args.output.output_dir.clone();
    request.extension = args.output.extension.clone();
    request.normalizer = normalizer(args.output.case_sensitive);
    request.dry_run = args.output.dry_run;

    let report = run_swap(&request)?;
    write_report(args.output.report.as_deref(), &report)?;
    Ok(report)
}

pub fn run_layers(args: &LayersArgs) -> Result<()> {
    let files = inspect_layers(&args.input_dir, &args.extension)?;
    print_layers(&files);
    Ok(())
}

pub fn run_presets() {
    print_presets(PRESETS);
}

fn normalizer(case_sensitive: bool) -> NameNormalizer {
    if case_sensitive {
        NameNormalizer::case_sensitive()
    } else {
        NameNormalizer::case_insensitive()
    }
}

fn write_report(path: Option<&Path>, report: &BatchReport) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let json = serde_json::to_string_pretty(report).context("serialize batch report")?;
    std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    info!(path = %path.display(), "wrote batch report");
    Ok(())
}
