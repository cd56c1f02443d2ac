use std::error::Error;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use super::ExportCmd;
use crate::bridge::{export_records, table_to_records, SheetError};
use crate::commands::Execute;
use crate::db::Executor;

/// Result of the export command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportResult {
    pub sheet: String,
    pub path: PathBuf,
    pub rows: usize,
}

impl Execute for ExportCmd {
    type Output = ExportResult;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        let table = executor.read_table(&self.statement.sql, &self.statement.params)?;
        let records = table_to_records(&table);

        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| SheetError::Io {
                path: self.dir.display().to_string(),
                source: e,
            })?;
        }
        let path = export_records(&records, &self.sheet, &self.dir)?;

        Ok(ExportResult {
            sheet: self.sheet,
            path,
            rows: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::import_records;
    use crate::commands::StatementArgs;
    use crate::test_utils::user_db;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    fn export(sql: &str, sheet: &str, dir: PathBuf) -> ExportCmd {
        ExportCmd {
            statement: StatementArgs {
                sql: sql.to_string(),
                params: vec![],
            },
            sheet: sheet.to_string(),
            dir,
        }
    }

    #[rstest]
    fn test_export_writes_every_row(user_db: (TempDir, Executor)) {
        let (dir, executor) = user_db;
        let out = dir.path().join("sheets");

        let result = export("SELECT * FROM UserTable ORDER BY userId", "users", out.clone())
            .execute(&executor)
            .unwrap();
        assert_eq!(result.rows, 2);
        assert_eq!(result.path, out.join("users.sheet.json"));

        let records = import_records(&result.path).unwrap();
        assert_eq!(records.len(), 2);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["userId", "displayName", "department"]);
        assert_eq!(records[1]["userId"], json!("11"));
    }

    #[rstest]
    fn test_export_empty_result_fails(user_db: (TempDir, Executor)) {
        let (dir, executor) = user_db;
        let err = export("SELECT * FROM UserTable WHERE 0", "none", dir.path().to_path_buf())
            .execute(&executor)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SheetError>(),
            Some(SheetError::Empty { .. })
        ));
    }
}
