use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use annolayer_cli::schema::Preset;
use annolayer_cli::types::{BatchReport, FileAction, FileLayers, FileReport};
use annolayer_map::MoveStatus;

pub fn print_summary(report: &BatchReport) {
    println!("Input: {}", report.input_dir.display());
    if report.dry_run {
        println!("Output: {} (dry run, nothing written)", report.output_dir.display());
    } else {
        println!("Output: {}", report.output_dir.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("File"),
        header_cell("Outcome"),
        header_cell("Action"),
        header_cell("Layers"),
        header_cell("Details"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    align_column(&mut table, 4, CellAlignment::Right);

    for (index, file) in report.files.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(file.file_name()),
            outcome_cell(file),
            action_cell(file.action, report.dry_run),
            layer_count_cell(file),
            details_cell(file),
        ]);
    }
    println!("{table}");

    let saved = report.count(FileAction::Saved);
    let skipped = report.count(FileAction::Skipped);
    let failed = report.count(FileAction::Failed);
    println!(
        "{saved} saved, {skipped} skipped, {failed} failed, {} unchanged of {} files",
        report.count(FileAction::Unchanged),
        report.total
    );
    if report.stopped {
        println!(
            "Execution stopped by user; {} file(s) not processed.",
            report.unprocessed()
        );
    }
    if failed > 0 {
        eprintln!("Errors:");
        for file in report.files.iter().filter(|f| f.action == FileAction::Failed) {
            if let Some(error) = &file.error {
                eprintln!("- {error}");
            }
        }
    }
}

pub fn print_layers(files: &[FileLayers]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("File"), header_cell("Layers")]);
    apply_table_style(&mut table);
    for entry in files {
        let name = entry
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let layers = match &entry.layers {
            Ok(layers) if layers.is_empty() => dim_cell("(none)"),
            Ok(layers) => Cell::new(
                layers
                    .iter()
                    .enumerate()
                    .map(|(i, name)| format!("{i}: {name}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Err(error) => Cell::new(error).fg(Color::Red),
        };
        table.add_row(vec![Cell::new(name), layers]);
    }
    println!("{table}");
}

pub fn print_presets(presets: &[Preset]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Preset"),
        header_cell("Slots"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for preset in presets {
        table.add_row(vec![
            Cell::new(preset.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(preset.slots.len()),
            Cell::new(preset.description),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn outcome_cell(file: &FileReport) -> Cell {
    match file.outcome {
        Some(outcome) => Cell::new(outcome),
        None => dim_cell("-"),
    }
}

fn action_cell(action: FileAction, dry_run: bool) -> Cell {
    match action {
        FileAction::Saved if dry_run => Cell::new("would save").fg(Color::Green),
        FileAction::Saved => Cell::new("✓ saved")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        FileAction::Skipped => Cell::new("skipped").fg(Color::Yellow),
        FileAction::Stopped => Cell::new("stopped")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FileAction::Failed => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FileAction::Unchanged => dim_cell(action.as_str()),
    }
}

fn layer_count_cell(file: &FileReport) -> Cell {
    if file.action == FileAction::Failed && file.original_layers.is_empty() {
        return dim_cell("-");
    }
    let before = file.original_layers.len();
    let after = file.final_layers.len();
    if before == after {
        Cell::new(after)
    } else {
        Cell::new(format!("{before} → {after}")).fg(Color::Cyan)
    }
}

fn details_cell(file: &FileReport) -> Cell {
    if let Some(error) = &file.error {
        return Cell::new(error).fg(Color::Red);
    }
    let mut details: Vec<String> = file
        .synthesized
        .iter()
        .map(|layer| format!("added '{}' (Id {})", layer.name, layer.id))
        .collect();
    details.extend(file.moves.iter().map(|m| match m.status {
        MoveStatus::Moved { from, to } => format!("'{}' {from} → {to}", m.name),
        MoveStatus::InPlace { position } => format!("'{}' already at {position}", m.name),
        MoveStatus::Missing => format!("'{}' not found", m.name),
    }));
    if details.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(details.join("\n"))
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
