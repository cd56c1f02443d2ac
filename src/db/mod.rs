//! SQLite access layer.
//!
//! This module provides the parameterized command execution layer:
//! - Connection provisioning (configured path, auto-created database file)
//! - Command execution with parameter binding and guaranteed teardown
//! - Result strategies that shape what a statement returns
//!
//! # Architecture
//!
//! Each call to [`Executor::execute`] opens exactly one connection and closes
//! it before returning. Nothing is pooled or cached between calls except the
//! resolved connection string. Results are copied out of the engine into
//! [`Table`] and [`ResultSet`], which own all their data.
//!
//! # Type Decisions
//!
//! **Why `i64` for integers?**
//! SQLite stores every integer as a 64-bit signed value. Narrower types would
//! need checked conversions on every read.
//!
//! **Why a closed `Strategy` enum instead of a callback?**
//! There are exactly three result shapes. An enum lets callers name the shape
//! they want and keeps statement lifetimes inside the executor.

mod connection;
mod executor;
mod param;
mod strategy;
mod table;
mod value;

pub use connection::{
    ConnectionDescriptor, ConnectionHandle, ConnectionStats, OpenConnection, Provisioner,
    StorageKind, DEFAULT_CONNECTION_NAME,
};
pub use executor::{Command, Executor, StatsSnapshot};
pub use param::{Param, StatementKind, StatementRequest, PLACEHOLDER_PREFIXES};
pub use strategy::{
    ExecutionOutcome, NonQuery, ResultStrategy, SetAdapter, SetFill, Strategy, TabularRead,
};
pub use table::{Column, ResultSet, RowRef, Table, DEFAULT_TABLE_NAME};
pub use value::{ColumnType, Value};

use std::path::Path;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection string '{name}' is not configured")]
    Configuration { name: String },

    #[error("Failed to provision database storage at '{path}': {source}")]
    StorageProvision {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open database '{path}': {source}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Statement rejected: {message}")]
    StatementBinding {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    #[error("Result strategy '{strategy}' failed: {source}")]
    Strategy {
        strategy: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl DbError {
    /// Classify an engine error raised while preparing or binding.
    ///
    /// Lock contention and unreadable files are connection failures;
    /// everything else the engine refuses is a statement rejection.
    pub fn from_engine(path: &Path, err: rusqlite::Error) -> Self {
        if is_connection_failure(&err) {
            DbError::Connection {
                path: path.display().to_string(),
                source: err,
            }
        } else {
            DbError::StatementBinding {
                message: err.to_string(),
                source: Some(err),
            }
        }
    }

    /// Classify an error raised inside a result strategy.
    ///
    /// Engine failures keep their engine classification; anything else
    /// (unexpected rows, conversion failures) is a strategy failure.
    pub fn from_strategy(strategy: &'static str, path: &Path, err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(..) => Self::from_engine(path, err),
            other => DbError::Strategy {
                strategy,
                source: other,
            },
        }
    }
}

fn is_connection_failure(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(
            ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::NotADatabase
                | ErrorCode::CannotOpen
                | ErrorCode::PermissionDenied
        )
    )
}
