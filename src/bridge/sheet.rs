//! Worksheet export and import for flat records.
//!
//! A worksheet is a named grid of cells saved as JSON. Export writes a header
//! row from the first record's keys followed by one row per record. Import
//! reads every cell back as text regardless of how it was stored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::debug;

use super::json::Record;

/// Extension appended to worksheet names on disk.
pub const SHEET_EXTENSION: &str = "sheet.json";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Failed to access worksheet '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid worksheet '{path}': {source}")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No records to write to worksheet '{name}'")]
    Empty { name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    /// First row is the header.
    pub rows: Vec<Vec<JsonValue>>,
}

impl Worksheet {
    pub fn header(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.iter().map(cell_text).collect())
            .unwrap_or_default()
    }

    /// Number of data rows, excluding the header.
    pub fn data_rows(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn save(&self, path: &Path) -> Result<(), SheetError> {
        let display = path.display().to_string();
        let text = serde_json::to_string_pretty(self).map_err(|e| SheetError::Format {
            path: display.clone(),
            source: e,
        })?;
        fs::write(path, text).map_err(|e| SheetError::Io {
            path: display,
            source: e,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SheetError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| SheetError::Io {
            path: display.clone(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| SheetError::Format {
            path: display,
            source: e,
        })
    }
}

/// Text of a cell: strings as-is, null as empty, anything else as JSON.
fn cell_text(cell: &JsonValue) -> String {
    match cell {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Lay out records as a worksheet.
///
/// The header comes from the first record's keys. Each data row lists a
/// record's values in that record's own key order.
pub fn records_to_sheet(records: &[Record], name: &str) -> Result<Worksheet, SheetError> {
    let first = records.first().ok_or_else(|| SheetError::Empty {
        name: name.to_string(),
    })?;

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(first.keys().cloned().map(JsonValue::String).collect());
    for record in records {
        rows.push(
            record
                .values()
                .map(|v| JsonValue::String(cell_text(v)))
                .collect(),
        );
    }

    Ok(Worksheet {
        name: name.to_string(),
        rows,
    })
}

/// Read a worksheet back into records, one per data row, every cell as text.
/// Missing trailing cells read as empty strings.
pub fn sheet_to_records(sheet: &Worksheet) -> Vec<Record> {
    let header = sheet.header();
    sheet
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(idx, key)| {
                    let text = row.get(idx).map(cell_text).unwrap_or_default();
                    (key.clone(), JsonValue::String(text))
                })
                .collect()
        })
        .collect()
}

/// File path for worksheet `name` under `dir`.
pub fn sheet_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.{}", name, SHEET_EXTENSION))
}

/// Write `records` to `<dir>/<name>.sheet.json`, returning the path.
pub fn export_records(records: &[Record], name: &str, dir: &Path) -> Result<PathBuf, SheetError> {
    let sheet = records_to_sheet(records, name)?;
    let path = sheet_path(dir, name);
    sheet.save(&path)?;
    debug!(path = %path.display(), rows = sheet.data_rows(), "exported worksheet");
    Ok(path)
}

/// Read records from a worksheet file.
pub fn import_records(path: &Path) -> Result<Vec<Record>, SheetError> {
    let sheet = Worksheet::load(path)?;
    debug!(path = %path.display(), rows = sheet.data_rows(), "imported worksheet");
    Ok(sheet_to_records(&sheet))
}
