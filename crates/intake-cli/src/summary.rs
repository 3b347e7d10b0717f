use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use intake_analysis::AnalysisResult;

pub fn print_summary(result: &AnalysisResult) {
    println!("File: {}", result.filename());
    println!("{}", summary_table(result));
    if !result.patients().is_empty() {
        println!("{}", patient_table(result));
    }
    if !result.warnings().is_empty() {
        println!("Warnings:");
        for warning in result.warnings() {
            println!("- {warning}");
        }
    }
    if !result.errors().is_empty() {
        eprintln!("Errors:");
        for error in result.errors() {
            eprintln!("- [{}] {}", error.code, error.message);
        }
    }
}

pub fn summary_table(result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Left);

    let status = if result.success() {
        Cell::new("success").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new("failed").fg(Color::Red).add_attribute(Attribute::Bold)
    };
    table.add_row(vec![Cell::new("Status"), status]);
    table.add_row(vec![Cell::new("Format"), Cell::new(result.format())]);
    table.add_row(vec![Cell::new("Patients"), count_cell(result.patients_count())]);
    table.add_row(vec![Cell::new("Visits"), count_cell(result.visits_count())]);
    table.add_row(vec![
        Cell::new("Observations"),
        count_cell(result.observations_count()),
    ]);
    table.add_row(vec![
        Cell::new("Strategy"),
        Cell::new(result.recommended_strategy()).fg(Color::Cyan),
    ]);
    let alternatives: Vec<String> = result
        .available_strategies()
        .iter()
        .skip(1)
        .map(ToString::to_string)
        .collect();
    if !alternatives.is_empty() {
        table.add_row(vec![
            Cell::new("Alternatives"),
            Cell::new(alternatives.join(", ")),
        ]);
    }
    table.add_row(vec![
        Cell::new("Estimated time"),
        Cell::new(result.estimated_import_time()),
    ]);
    table
}

fn patient_table(result: &AnalysisResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Patient ID"), header_cell("Name")]);
    apply_table_style(&mut table);
    for patient in result.patients() {
        let name = match &patient.name {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        };
        table.add_row(vec![Cell::new(&patient.id), name]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
