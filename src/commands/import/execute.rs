use std::error::Error;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::ImportCmd;
use crate::bridge::{import_records, record_to_params, Record};
use crate::commands::Execute;
use crate::db::{Executor, StatementKind};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Worksheet header '{name}' is not a valid column name")]
    InvalidColumn { name: String },
}

/// Result of the import command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub table: String,
    pub path: PathBuf,
    pub inserted: usize,
}

/// Column names must also be usable as placeholder names.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `INSERT INTO "table" ("a", "b") VALUES (@a, @b)` for the record's fields.
fn insert_statement(table: &str, record: &Record) -> Result<String, ImportError> {
    if let Some(bad) = record.keys().find(|k| !is_identifier(k)) {
        return Err(ImportError::InvalidColumn { name: bad.clone() });
    }
    let columns: Vec<String> = record.keys().map(|k| quote_identifier(k)).collect();
    let placeholders: Vec<String> = record.keys().map(|k| format!("@{}", k)).collect();
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders.join(", ")
    ))
}

impl Execute for ImportCmd {
    type Output = ImportResult;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        let records = import_records(&self.sheet)?;

        let mut inserted = 0;
        for record in &records {
            let sql = insert_statement(&self.table, record)?;
            inserted += executor.execute_non_query(StatementKind::Text, &sql, &record_to_params(record))?;
        }
        debug!(table = %self.table, inserted, "imported worksheet rows");

        Ok(ImportResult {
            table: self.table,
            path: self.sheet,
            inserted,
        })
    }
}
