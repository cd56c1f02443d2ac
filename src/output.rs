//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;

use crate::db::{ResultSet, Table};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Render a table as an aligned text grid.
///
/// ```text
/// userId | displayName
/// -------+------------
/// 10     | A
/// ```
pub fn render_grid(table: &Table) -> String {
    if table.columns().is_empty() {
        return "(no columns)".to_string();
    }

    let header: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
    let cells: Vec<Vec<String>> = table
        .rows()
        .map(|row| row.values().iter().map(|v| v.to_string()).collect())
        .collect();

    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 3);
    lines.push(line(&header));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        lines.push(line(row));
    }
    lines.push(format!("({} row{})", cells.len(), if cells.len() == 1 { "" } else { "s" }));
    lines.join("\n")
}

impl Outputable for Table {
    fn to_table(&self) -> String {
        render_grid(self)
    }
}

impl Outputable for ResultSet {
    fn to_table(&self) -> String {
        if self.is_empty() {
            return "No tables returned.".to_string();
        }
        self.tables()
            .iter()
            .map(|table| format!("{}:\n{}", table.name(), render_grid(table)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
