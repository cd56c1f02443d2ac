use std::error::Error;

use serde::Serialize;
use tracing::debug;

use super::SeedCmd;
use crate::bridge::{table_to_records, Record};
use crate::commands::Execute;
use crate::db::{Executor, Param, StatementKind};

const CREATE_USER_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS UserTable (
    userId integer primary key autoincrement,
    displayName varchar(20),
    department varchar(20)
)";

const INSERT_USER: &str =
    "INSERT INTO UserTable (userId, displayName, department) VALUES (@userid, @displayName, @department)";

const SELECT_USER: &str = "SELECT * FROM UserTable WHERE userId = @userid";

/// Result of the seed command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedResult {
    /// Whether the sample user was inserted by this run
    pub inserted: bool,
    pub records: Vec<Record>,
}

impl Execute for SeedCmd {
    type Output = SeedResult;

    fn execute(self, executor: &Executor) -> Result<Self::Output, Box<dyn Error>> {
        executor.execute_non_query(StatementKind::Text, CREATE_USER_TABLE, &[])?;

        let existing = executor.read_table("SELECT * FROM UserTable", &[])?;
        let inserted = if existing.is_empty() {
            executor.execute_non_query(
                StatementKind::Text,
                INSERT_USER,
                &[
                    Param::new("userid", self.user_id),
                    Param::new("displayName", self.display_name.as_str()),
                    Param::new("department", self.department.as_str()),
                ],
            )? > 0
        } else {
            false
        };
        debug!(inserted, existing = existing.len(), "seeded user table");

        let user = executor.read_table(SELECT_USER, &[Param::new("userid", self.user_id)])?;
        Ok(SeedResult {
            inserted,
            records: table_to_records(&user),
        })
    }
}
