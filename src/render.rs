use std::io::{self, Write};

use serde::Deserialize;
use unicode_width::UnicodeWidthStr;

use crate::db::{ExecutionResult, Table};

/// How query results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Table,
    Csv,
}

impl OutputMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
        }
    }
}

pub fn render<W: Write>(out: &mut W, result: &ExecutionResult, mode: OutputMode) -> io::Result<()> {
    match result {
        ExecutionResult::Query(table) => match mode {
            OutputMode::Table => render_table(out, table),
            OutputMode::Csv => render_csv(out, table),
        },
        ExecutionResult::Mutation {
            rows_affected,
            last_insert_id,
        } => {
            writeln!(out, "{rows_affected} rows affected")?;
            writeln!(out, "last insert id: {last_insert_id}")
        }
    }
}

pub fn render_table<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.width()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let separator = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let separator = format!("+{separator}+");

    writeln!(out, "{separator}")?;
    write_row(out, &table.columns, &widths)?;
    writeln!(out, "{separator}")?;
    for row in &table.rows {
        write_row(out, row, &widths)?;
    }
    if !table.rows.is_empty() {
        writeln!(out, "{separator}")?;
    }
    writeln!(out, "({} rows)", table.row_count)
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    write!(out, "|")?;
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.width());
        write!(out, " {}{} |", " ".repeat(pad), cell)?;
    }
    writeln!(out)
}

pub fn render_csv<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    write_csv_record(out, &table.columns)?;
    for row in &table.rows {
        write_csv_record(out, row)?;
    }
    Ok(())
}

fn write_csv_record<W: Write>(out: &mut W, fields: &[String]) -> io::Result<()> {
    let record: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
    writeln!(out, "{}", record.join(","))
}

fn escape_csv(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
