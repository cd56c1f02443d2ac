//! Parameterized command execution.
//!
//! Every call provisions and opens its own connection, prepares and binds one
//! statement, hands it to a result strategy, and releases the statement and
//! the connection before returning. Release happens on every exit path: the
//! statement is dropped before the [`OpenConnection`] guard that owns the
//! connection, and the guard closes the connection in `Drop`.

use std::path::Path;
use std::sync::Arc;

use rusqlite::{Batch, Statement};
use tracing::debug;

use super::connection::{ConnectionStats, OpenConnection, Provisioner};
use super::param::{Param, StatementKind, StatementRequest};
use super::strategy::{ExecutionOutcome, NonQuery, ResultStrategy, SetFill, Strategy, TabularRead};
use super::table::{ResultSet, Table};
use super::DbError;
use crate::config::ConfigFile;

/// A prepared statement bound to an open connection.
pub struct Command<'conn> {
    path: &'conn Path,
    statement: Statement<'conn>,
}

impl<'conn> Command<'conn> {
    /// Prepare `sql` on `connection`.
    ///
    /// SQLite has no stored routines, so `StoredProcedure` is rejected here
    /// after the connection was opened, like any other statement the engine
    /// refuses.
    pub fn prepare(
        connection: &'conn OpenConnection,
        kind: StatementKind,
        sql: &'conn str,
    ) -> Result<Self, DbError> {
        let path = connection.path();
        if kind == StatementKind::StoredProcedure {
            return Err(DbError::StatementBinding {
                message: "stored procedures are not supported by SQLite".to_string(),
                source: None,
            });
        }

        let conn = connection.connection().ok_or_else(|| DbError::StatementBinding {
            message: "connection already closed".to_string(),
            source: None,
        })?;
        // Whitespace and comments yield no statement; anything else after
        // the first one is a second statement.
        let mut batch = Batch::new(conn, sql);
        let statement = batch
            .next()
            .map_err(|e| DbError::from_engine(path, e))?
            .ok_or_else(|| DbError::StatementBinding {
                message: "empty statement".to_string(),
                source: None,
            })?;
        if !matches!(batch.next(), Ok(None)) {
            return Err(DbError::StatementBinding {
                message: "multiple statements in one command".to_string(),
                source: None,
            });
        }

        Ok(Self { path, statement })
    }

    /// Bind parameters in order.
    ///
    /// Named parameters go to their matching placeholder. Positional ones
    /// (empty name) fill the first slot not yet bound. A named parameter with
    /// no matching placeholder is passed to the engine at the slot after the
    /// last placeholder, and the engine's rejection is returned as-is.
    pub fn bind(&mut self, params: &[Param]) -> Result<(), DbError> {
        let count = self.statement.parameter_count();
        let mut bound = vec![false; count + 1];
        let mut overflow = count;

        for param in params {
            let index = if param.is_positional() {
                (1..=count).find(|&i| !bound[i]).unwrap_or_else(|| {
                    overflow += 1;
                    overflow
                })
            } else {
                match self.placeholder_index(param)? {
                    Some(index) => index,
                    None => {
                        overflow += 1;
                        overflow
                    }
                }
            };

            debug!(name = param.name(), index, "binding parameter");
            self.statement
                .raw_bind_parameter(index, param.value())
                .map_err(|e| DbError::from_engine(self.path, e))?;
            if index <= count {
                bound[index] = true;
            }
        }
        Ok(())
    }

    fn placeholder_index(&self, param: &Param) -> Result<Option<usize>, DbError> {
        for candidate in param.placeholder_names() {
            let found = self
                .statement
                .parameter_index(&candidate)
                .map_err(|e| DbError::from_engine(self.path, e))?;
            if found.is_some() {
                return Ok(found);
            }
        }
        Ok(None)
    }

    pub fn path(&self) -> &'conn Path {
        self.path
    }

    pub fn column_count(&self) -> usize {
        self.statement.column_count()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub(super) fn statement_mut(&mut self) -> &mut Statement<'conn> {
        &mut self.statement
    }
}

/// Point-in-time copy of the executor's connection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub opened: usize,
    pub closed: usize,
}

/// Executes one statement per call against the configured database.
#[derive(Debug)]
pub struct Executor {
    provisioner: Provisioner,
    stats: Arc<ConnectionStats>,
}

impl Executor {
    pub fn new(provisioner: Provisioner) -> Self {
        Self {
            provisioner,
            stats: Arc::new(ConnectionStats::default()),
        }
    }

    pub fn from_config(config: ConfigFile) -> Self {
        Self::new(Provisioner::new(Arc::new(config)))
    }

    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            opened: self.stats.opened(),
            closed: self.stats.closed(),
        }
    }

    /// Execute `sql` with `params` and shape the result with `strategy`.
    pub fn execute(
        &self,
        kind: StatementKind,
        sql: &str,
        params: &[Param],
        strategy: impl Into<Strategy>,
    ) -> Result<ExecutionOutcome, DbError> {
        let strategy = strategy.into();
        debug!(strategy = strategy.name(), ?kind, sql, "executing statement");
        self.scoped(kind, sql, params, |command| strategy.consume(command))
    }

    pub fn run(
        &self,
        request: &StatementRequest,
        strategy: impl Into<Strategy>,
    ) -> Result<ExecutionOutcome, DbError> {
        self.execute(request.kind, &request.sql, &request.params, strategy)
    }

    /// Read the rows of a text query into a table.
    pub fn read_table(&self, sql: &str, params: &[Param]) -> Result<Table, DbError> {
        self.scoped(StatementKind::Text, sql, params, |command| {
            TabularRead.read(command)
        })
    }

    /// Run a statement for its side effects and return the affected rows.
    pub fn execute_non_query(
        &self,
        kind: StatementKind,
        sql: &str,
        params: &[Param],
    ) -> Result<usize, DbError> {
        self.scoped(kind, sql, params, |command| NonQuery.run(command))
    }

    /// Fill a disconnected result set.
    pub fn fill_set(
        &self,
        kind: StatementKind,
        sql: &str,
        params: &[Param],
    ) -> Result<ResultSet, DbError> {
        self.scoped(kind, sql, params, |command| SetFill.fill(command))
    }

    fn scoped<T>(
        &self,
        kind: StatementKind,
        sql: &str,
        params: &[Param],
        consume: impl FnOnce(&mut Command<'_>) -> Result<T, DbError>,
    ) -> Result<T, DbError> {
        let handle = self.provisioner.open()?;
        let connection = handle.open(&self.stats)?;

        // Declared after `connection`, so it is dropped first on every path.
        let mut command = Command::prepare(&connection, kind, sql)?;
        command.bind(params)?;
        let result = consume(&mut command);
        drop(command);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::DEFAULT_CONNECTION_NAME;
    use crate::db::value::{ColumnType, Value};
    use rstest::{fixture, rstest};
    use tempfile::{tempdir, TempDir};

    const CREATE_USERS: &str =
        "CREATE TABLE UserTable (userId int primary key, displayName text, department text)";

    #[fixture]
    fn executor() -> (TempDir, Executor) {
        let dir = tempdir().unwrap();
        let config = ConfigFile::default().with_connection_string(DEFAULT_CONNECTION_NAME, "db/test.db");
        let provisioner = Provisioner::new(Arc::new(config)).with_working_dir(dir.path());
        (dir, Executor::new(provisioner))
    }

    fn users(executor: &Executor) {
        executor
            .execute_non_query(StatementKind::Text, CREATE_USERS, &[])
            .unwrap();
        executor
            .execute_non_query(
                StatementKind::Text,
                "INSERT INTO UserTable VALUES (@id, @name, @dept)",
                &[Param::new("id", 10), Param::new("name", "A"), Param::new("dept", "X")],
            )
            .unwrap();
    }

    #[rstest]
    fn test_ddl_returns_zero(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let affected = executor
            .execute_non_query(StatementKind::Text, CREATE_USERS, &[])
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[rstest]
    fn test_user_table_scenario(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);

        let table = executor
            .read_table(
                "SELECT displayName FROM UserTable WHERE userId = @userid",
                &[Param::new("userid", 10)],
            )
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.column_names(), vec!["displayName"]);
        assert_eq!(table.columns()[0].column_type, ColumnType::Text);
        assert_eq!(table.get(0, "displayName"), Some(&Value::Text("A".into())));
    }

    #[rstest]
    fn test_execute_dispatches_on_strategy(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);
        let sql = "SELECT * FROM UserTable";

        let read = executor.execute(StatementKind::Text, sql, &[], TabularRead).unwrap();
        assert!(matches!(read, ExecutionOutcome::Table(ref t) if t.len() == 1));

        let filled = executor.execute(StatementKind::Text, sql, &[], SetFill).unwrap();
        let set = filled.into_result_set().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.table("Table").map(Table::len), Some(1));

        let updated = executor
            .execute(
                StatementKind::Text,
                "UPDATE UserTable SET department = @d",
                &[Param::new("d", "Z")],
                NonQuery,
            )
            .unwrap();
        assert_eq!(updated.affected(), Some(1));
    }

    #[rstest]
    fn test_positional_params(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);
        let table = executor
            .read_table(
                "SELECT userId FROM UserTable WHERE displayName = ? AND department = ?",
                &[Param::positional("A"), Param::positional("X")],
            )
            .unwrap();
        assert_eq!(table.get(0, "userId"), Some(&Value::Integer(10)));
    }

    #[rstest]
    fn test_unmatched_param_is_engine_rejection(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);
        let err = executor
            .read_table(
                "SELECT * FROM UserTable WHERE userId = @userid",
                &[Param::new("userid", 10), Param::new("nope", 1)],
            )
            .unwrap_err();
        assert!(matches!(err, DbError::StatementBinding { source: Some(_), .. }));
    }

    #[rstest]
    fn test_stored_procedure_rejected_and_connection_closed(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let err = executor
            .execute_non_query(StatementKind::StoredProcedure, "sp_users", &[])
            .unwrap_err();
        assert!(matches!(err, DbError::StatementBinding { source: None, .. }));
        assert_eq!(executor.stats(), StatsSnapshot { opened: 1, closed: 1 });
    }

    #[rstest]
    fn test_syntax_error(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let err = executor.read_table("SELEC 1", &[]).unwrap_err();
        assert!(matches!(err, DbError::StatementBinding { .. }));
    }

    #[rstest]
    fn test_non_query_on_select_is_strategy_error(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);
        let err = executor
            .execute_non_query(StatementKind::Text, "SELECT * FROM UserTable", &[])
            .unwrap_err();
        assert!(matches!(err, DbError::Strategy { strategy: "non-query", .. }));
        let stats = executor.stats();
        assert_eq!(stats.opened, stats.closed);
    }

    #[rstest]
    fn test_fill_on_ddl_is_empty(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let set = executor.fill_set(StatementKind::Text, CREATE_USERS, &[]).unwrap();
        assert!(set.is_empty());
        // The statement still ran.
        let table = executor.read_table("SELECT count(*) AS n FROM UserTable", &[]).unwrap();
        assert_eq!(table.get(0, "n"), Some(&Value::Integer(0)));
    }

    #[rstest]
    fn test_multiple_statements_rejected(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let err = executor
            .execute_non_query(StatementKind::Text, "CREATE TABLE a (x); CREATE TABLE b (y)", &[])
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::StatementBinding { ref message, source: None } if message.contains("multiple")
        ));

        // Neither statement ran.
        let tables = executor.read_table("SELECT name FROM sqlite_master", &[]).unwrap();
        assert!(tables.is_empty());
        assert_eq!(executor.stats(), StatsSnapshot { opened: 2, closed: 2 });
    }

    #[rstest]
    #[case("SELECT 1 AS n;")]
    #[case("SELECT 1 AS n; -- trailing note\n")]
    #[case("/* lead */ SELECT 1 AS n ;  ")]
    fn test_trailing_separator_and_comments_allowed(
        executor: (TempDir, Executor),
        #[case] sql: &str,
    ) {
        let (_dir, executor) = executor;
        let table = executor.read_table(sql, &[]).unwrap();
        assert_eq!(table.get(0, "n"), Some(&Value::Integer(1)));
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t")]
    #[case("-- nothing here")]
    fn test_empty_statement(executor: (TempDir, Executor), #[case] sql: &str) {
        let (_dir, executor) = executor;
        let err = executor.read_table(sql, &[]).unwrap_err();
        assert!(matches!(
            err,
            DbError::StatementBinding { ref message, source: None } if message == "empty statement"
        ));
        assert_eq!(executor.stats(), StatsSnapshot { opened: 1, closed: 1 });
    }

    #[rstest]
    fn test_numbered_placeholder_bound_by_name(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let table = executor
            .read_table("SELECT ?1 AS v, ?2 AS w", &[Param::new("?2", "b"), Param::new("?1", 5)])
            .unwrap();
        assert_eq!(table.get(0, "v"), Some(&Value::Integer(5)));
        assert_eq!(table.get(0, "w"), Some(&Value::Text("b".into())));
    }

    #[rstest]
    fn test_run_statement_request(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        users(&executor);

        let request = StatementRequest::text("INSERT INTO UserTable VALUES (?, ?, @dept)")
            .param("dept", "Y")
            .params([Param::positional(11), Param::positional("B")]);
        let inserted = executor.run(&request, NonQuery).unwrap();
        assert_eq!(inserted.affected(), Some(1));

        let read = executor
            .run(
                &StatementRequest::text("SELECT department FROM UserTable WHERE userId = @id")
                    .param("id", 11),
                TabularRead,
            )
            .unwrap()
            .into_table()
            .unwrap();
        assert_eq!(read.get(0, "department"), Some(&Value::Text("Y".into())));
    }

    #[rstest]
    fn test_run_stored_procedure_request(executor: (TempDir, Executor)) {
        let (_dir, executor) = executor;
        let request = StatementRequest::text("sp_add_user")
            .with_kind(StatementKind::StoredProcedure)
            .param("userid", 10)
            .param("displayName", "A");
        let err = executor.run(&request, NonQuery).unwrap_err();
        assert!(matches!(err, DbError::StatementBinding { source: None, .. }));
        assert_eq!(executor.stats(), StatsSnapshot { opened: 1, closed: 1 });
    }
}
