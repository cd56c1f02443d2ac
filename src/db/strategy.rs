//! Result strategies.
//!
//! A strategy consumes a bound [`Command`] and shapes what comes back. The set
//! is closed: callers pick one of the three variants of [`Strategy`] per call,
//! never by inspecting the SQL. Strategies borrow the command only for the
//! duration of `consume` and return fully owned results.

use enum_dispatch::enum_dispatch;
use serde::Serialize;
use tracing::debug;

use super::executor::Command;
use super::table::{ResultSet, Table};
use super::DbError;

/// What a single `execute` call produced. Exactly one variant per call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Affected(usize),
    Table(Table),
    ResultSet(ResultSet),
}

impl ExecutionOutcome {
    pub fn affected(&self) -> Option<usize> {
        match self {
            Self::Affected(count) => Some(*count),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            Self::ResultSet(set) => Some(set),
            _ => None,
        }
    }
}

/// Consume a live command and produce an outcome.
#[enum_dispatch]
pub trait ResultStrategy {
    fn consume(&self, command: &mut Command<'_>) -> Result<ExecutionOutcome, DbError>;

    /// Name used in logs and `DbError::Strategy`.
    fn name(&self) -> &'static str;
}

/// Read every row into a disconnected [`Table`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabularRead;

/// Execute for side effects and report the affected-row count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonQuery;

/// Fill a disconnected [`ResultSet`] through a [`SetAdapter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetFill;

#[enum_dispatch(ResultStrategy)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TabularRead,
    NonQuery,
    SetFill,
}

impl TabularRead {
    /// Step the cursor to completion, copying every cell out of the engine.
    ///
    /// Statements without result columns still run; they yield an empty table.
    pub fn read(&self, command: &mut Command<'_>) -> Result<Table, DbError> {
        let path = command.path();
        let names = command.column_names();
        let width = names.len();
        let mut rows = Vec::new();

        let mut cursor = command.statement_mut().raw_query();
        while let Some(row) = cursor
            .next()
            .map_err(|e| DbError::from_strategy(self.name(), path, e))?
        {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                let cell = row
                    .get_ref(idx)
                    .map_err(|e| DbError::from_strategy(self.name(), path, e))?;
                values.push(cell.into());
            }
            rows.push(values);
        }

        debug!(rows = rows.len(), columns = width, "materialized table");
        Ok(Table::new(names, rows))
    }
}

impl ResultStrategy for TabularRead {
    fn consume(&self, command: &mut Command<'_>) -> Result<ExecutionOutcome, DbError> {
        self.read(command).map(ExecutionOutcome::Table)
    }

    fn name(&self) -> &'static str {
        "tabular-read"
    }
}

impl NonQuery {
    /// Run the statement once. DDL and other statements without an
    /// affected-row concept report 0.
    pub fn run(&self, command: &mut Command<'_>) -> Result<usize, DbError> {
        let path = command.path();
        let affected = command
            .statement_mut()
            .raw_execute()
            .map_err(|e| DbError::from_strategy(self.name(), path, e))?;
        debug!(affected, "executed non-query");
        Ok(affected)
    }
}

impl ResultStrategy for NonQuery {
    fn consume(&self, command: &mut Command<'_>) -> Result<ExecutionOutcome, DbError> {
        self.run(command).map(ExecutionOutcome::Affected)
    }

    fn name(&self) -> &'static str {
        "non-query"
    }
}

/// Runs a command and fills a result set with what it returned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetAdapter;

impl SetAdapter {
    /// Fill `set` from `command`, returning the number of rows added.
    ///
    /// A statement with result columns adds one table; anything else is
    /// executed and adds nothing.
    pub fn fill(&self, command: &mut Command<'_>, set: &mut ResultSet) -> Result<usize, DbError> {
        if command.column_count() == 0 {
            NonQuery.run(command)?;
            return Ok(0);
        }
        let table = TabularRead.read(command)?;
        let rows = table.len();
        set.push(table);
        Ok(rows)
    }
}

impl SetFill {
    pub fn fill(&self, command: &mut Command<'_>) -> Result<ResultSet, DbError> {
        let mut set = ResultSet::new();
        let rows = SetAdapter.fill(command, &mut set)?;
        debug!(tables = set.len(), rows, "filled result set");
        Ok(set)
    }
}

impl ResultStrategy for SetFill {
    fn consume(&self, command: &mut Command<'_>) -> Result<ExecutionOutcome, DbError> {
        self.fill(command).map(ExecutionOutcome::ResultSet)
    }

    fn name(&self) -> &'static str {
        "set-fill"
    }
}
