//! Shared test utilities for execute and integration tests.
//!
//! This module provides common helpers used across command execute tests.

use std::sync::Arc;

use rstest::fixture;
use tempfile::{tempdir, TempDir};

use crate::config::ConfigFile;
use crate::db::{Executor, Param, Provisioner, StatementKind, DEFAULT_CONNECTION_NAME};

/// Relative database path used by test executors.
pub const TEST_DB_PATH: &str = "data/test.db";

/// Create an executor whose database lives under a fresh temporary directory.
///
/// The database file is not created until the first statement runs.
pub fn temp_executor() -> (TempDir, Executor) {
    let dir = tempdir().expect("Failed to create temp dir");
    let executor = executor_in(&dir);
    (dir, executor)
}

/// Create an executor for the test database under `dir`.
pub fn executor_in(dir: &TempDir) -> Executor {
    let config = ConfigFile::default().with_connection_string(DEFAULT_CONNECTION_NAME, TEST_DB_PATH);
    Executor::new(Provisioner::new(Arc::new(config)).with_working_dir(dir.path()))
}

/// Create `UserTable` and insert one row per `(id, name, department)`.
pub fn seed_users(executor: &Executor, users: &[(i64, &str, &str)]) {
    executor
        .execute_non_query(
            StatementKind::Text,
            "CREATE TABLE UserTable (userId integer primary key, displayName varchar(20), department varchar(20))",
            &[],
        )
        .expect("Create should succeed");

    for (id, name, department) in users {
        executor
            .execute_non_query(
                StatementKind::Text,
                "INSERT INTO UserTable VALUES (@userid, @displayName, @department)",
                &[
                    Param::new("userid", *id),
                    Param::new("displayName", *name),
                    Param::new("department", *department),
                ],
            )
            .expect("Insert should succeed");
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Executor over an empty database.
#[fixture]
pub fn empty_db() -> (TempDir, Executor) {
    temp_executor()
}

/// Executor over a database holding two users.
#[fixture]
pub fn user_db() -> (TempDir, Executor) {
    let (dir, executor) = temp_executor();
    seed_users(&executor, &[(10, "A", "X"), (11, "B", "Y")]);
    (dir, executor)
}
