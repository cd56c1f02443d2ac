use std::error::Error;

use super::FillCmd;
use crate::commands::Execute;
use crate::db::{Executor, ResultSet};

impl Execute for FillCmd {
    type Output = ResultSet;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        Ok(executor.fill_set(self.kind, &self.statement.sql, &self.statement.params)?)
    }
}
