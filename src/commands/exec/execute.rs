use std::error::Error;

use serde::Serialize;

use super::ExecCmd;
use crate::commands::Execute;
use crate::db::Executor;

/// Result of the exec command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffectedResult {
    pub sql: String,
    pub affected: usize,
}

impl Execute for ExecCmd {
    type Output = AffectedResult;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        let affected =
            executor.execute_non_query(self.kind, &self.statement.sql, &self.statement.params)?;
        Ok(AffectedResult {
            sql: self.statement.sql,
            affected,
        })
    }
}
