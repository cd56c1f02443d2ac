use std::error::Error;

use super::QueryCmd;
use crate::commands::Execute;
use crate::db::{Executor, Table};

impl Execute for QueryCmd {
    type Output = Table;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        Ok(executor.read_table(&self.statement.sql, &self.statement.params)?)
    }
}
