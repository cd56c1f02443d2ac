//! Database connection provisioning.
//!
//! The provisioner turns the configured connection string into an absolute
//! database path, creates the backing directory and an empty database file on
//! first use, and hands out unopened connection handles. Opening a handle
//! yields an [`OpenConnection`] guard that closes the connection when dropped.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use super::DbError;
use crate::config::ConfigFile;

/// Name of the configuration entry holding the database path.
pub const DEFAULT_CONNECTION_NAME: &str = "ConnectionString";

/// Where the database lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    File,
}

/// Connection string resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub storage_kind: StorageKind,
    pub configured_path: PathBuf,
}

impl ConnectionDescriptor {
    pub fn file(configured_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_kind: StorageKind::File,
            configured_path: configured_path.into(),
        }
    }

    /// Absolute database path under `working_dir`. Absolute configured paths
    /// are returned unchanged.
    pub fn resolve_path(&self, working_dir: &Path) -> PathBuf {
        working_dir.join(&self.configured_path)
    }
}

/// Counts of connections opened and closed over an executor's lifetime.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    opened: AtomicUsize,
    closed: AtomicUsize,
}

impl ConnectionStats {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Connections currently open.
    pub fn open_now(&self) -> usize {
        self.opened().saturating_sub(self.closed())
    }
}

/// Resolves the configured connection string once and provisions storage.
#[derive(Debug)]
pub struct Provisioner {
    config: Arc<ConfigFile>,
    entry: String,
    working_dir: Option<PathBuf>,
    descriptor: OnceLock<ConnectionDescriptor>,
}

impl Provisioner {
    pub fn new(config: Arc<ConfigFile>) -> Self {
        Self {
            config,
            entry: DEFAULT_CONNECTION_NAME.to_string(),
            working_dir: None,
            descriptor: OnceLock::new(),
        }
    }

    /// Resolve relative paths against `dir` instead of the process working
    /// directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Read the connection string from a different configuration entry.
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = entry.into();
        self.descriptor = OnceLock::new();
        self
    }

    /// Read the configured connection string, caching it for later calls.
    pub fn resolve(&self) -> Result<&ConnectionDescriptor, DbError> {
        if let Some(descriptor) = self.descriptor.get() {
            return Ok(descriptor);
        }

        let path = self
            .config
            .connection_string(&self.entry)
            .ok_or_else(|| DbError::Configuration {
                name: self.entry.clone(),
            })?;
        debug!(entry = %self.entry, path, "resolved connection string");
        Ok(self
            .descriptor
            .get_or_init(|| ConnectionDescriptor::file(path)))
    }

    /// Absolute path of the database file.
    pub fn database_path(&self) -> Result<PathBuf, DbError> {
        let descriptor = self.resolve()?;
        let working_dir = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(|e| DbError::StorageProvision {
                path: descriptor.configured_path.display().to_string(),
                source: e,
            })?,
        };
        Ok(descriptor.resolve_path(&working_dir))
    }

    /// Provision storage and return an unopened handle to it.
    ///
    /// Creates the parent directory and a zero-byte database file when they
    /// are missing. An existing file is never truncated.
    pub fn open(&self) -> Result<ConnectionHandle, DbError> {
        let path = self.database_path()?;
        if !path.exists() {
            provision_file(&path)?;
        }
        Ok(ConnectionHandle { path })
    }
}

fn provision_file(path: &Path) -> Result<(), DbError> {
    let provision_err = |e: std::io::Error| DbError::StorageProvision {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(provision_err)?;
            debug!(dir = %dir.display(), "created database directory");
        }
    }

    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => {
            debug!(path = %path.display(), "created empty database file");
            Ok(())
        }
        // Another caller created it between the existence check and here.
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(provision_err(e)),
    }
}

/// Unopened connection pointing at a provisioned database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    path: PathBuf,
}

impl ConnectionHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the connection. The file must already exist; opening never
    /// creates it.
    pub fn open(self, stats: &Arc<ConnectionStats>) -> Result<OpenConnection, DbError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags).map_err(|e| {
            DbError::Connection {
                path: self.path.display().to_string(),
                source: e,
            }
        })?;

        stats.opened.fetch_add(1, Ordering::SeqCst);
        debug!(path = %self.path.display(), "opened connection");
        Ok(OpenConnection {
            conn: Some(conn),
            path: self.path,
            stats: Arc::clone(stats),
        })
    }
}

/// An open connection that is closed when the guard is dropped.
#[derive(Debug)]
pub struct OpenConnection {
    conn: Option<Connection>,
    path: PathBuf,
    stats: Arc<ConnectionStats>,
}

impl OpenConnection {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn connection(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }
}

impl Drop for OpenConnection {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else { return };
        if let Err((_conn, e)) = conn.close() {
            warn!(path = %self.path.display(), error = %e, "failed to close connection cleanly");
        }
        self.stats.closed.fetch_add(1, Ordering::SeqCst);
        debug!(path = %self.path.display(), "closed connection");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::{tempdir, TempDir};

    #[fixture]
    fn workspace() -> (TempDir, Provisioner) {
        let dir = tempdir().unwrap();
        let config = ConfigFile::default().with_connection_string(DEFAULT_CONNECTION_NAME, "data/app.db");
        let provisioner = Provisioner::new(Arc::new(config)).with_working_dir(dir.path());
        (dir, provisioner)
    }

    #[rstest]
    fn test_resolve_missing_entry() {
        let provisioner = Provisioner::new(Arc::new(ConfigFile::default()));
        let err = provisioner.resolve().unwrap_err();
        assert!(matches!(err, DbError::Configuration { ref name } if name == "ConnectionString"));
    }

    #[rstest]
    fn test_resolve_is_cached(workspace: (TempDir, Provisioner)) {
        let (_dir, provisioner) = workspace;
        let first = provisioner.resolve().unwrap() as *const ConnectionDescriptor;
        let second = provisioner.resolve().unwrap() as *const ConnectionDescriptor;
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_resolve_path_is_idempotent() {
        let descriptor = ConnectionDescriptor::file("data/app.db");
        let base = Path::new("/srv/app");
        assert_eq!(descriptor.resolve_path(base), descriptor.resolve_path(base));
        assert_eq!(descriptor.resolve_path(base), PathBuf::from("/srv/app/data/app.db"));
    }

    #[rstest]
    fn test_absolute_configured_path_is_kept() {
        let descriptor = ConnectionDescriptor::file("/var/db/app.db");
        assert_eq!(
            descriptor.resolve_path(Path::new("/srv/app")),
            PathBuf::from("/var/db/app.db")
        );
    }

    #[rstest]
    fn test_open_creates_directory_and_empty_file(workspace: (TempDir, Provisioner)) {
        let (dir, provisioner) = workspace;
        let db_path = dir.path().join("data/app.db");
        assert!(!db_path.exists());

        let handle = provisioner.open().unwrap();
        assert_eq!(handle.path(), db_path);
        assert!(db_path.is_file());
        assert_eq!(fs::metadata(&db_path).unwrap().len(), 0);
    }

    #[rstest]
    fn test_open_does_not_truncate_existing_file(workspace: (TempDir, Provisioner)) {
        let (dir, provisioner) = workspace;
        let db_path = dir.path().join("data/app.db");
        fs::create_dir_all(db_path.parent().unwrap()).unwrap();
        fs::write(&db_path, b"existing").unwrap();

        provisioner.open().unwrap();
        assert_eq!(fs::read(&db_path).unwrap(), b"existing");
    }

    #[rstest]
    fn test_open_fails_when_directory_cannot_be_created(workspace: (TempDir, Provisioner)) {
        let (dir, provisioner) = workspace;
        // A file where the directory should go.
        fs::write(dir.path().join("data"), b"").unwrap();

        let err = provisioner.open().unwrap_err();
        assert!(matches!(err, DbError::StorageProvision { .. }));
    }

    #[rstest]
    fn test_guard_closes_on_drop(workspace: (TempDir, Provisioner)) {
        let (_dir, provisioner) = workspace;
        let stats = Arc::new(ConnectionStats::default());

        let conn = provisioner.open().unwrap().open(&stats).unwrap();
        assert_eq!(stats.open_now(), 1);
        drop(conn);
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.closed(), 1);
    }

    #[rstest]
    fn test_open_directory_is_connection_error(workspace: (TempDir, Provisioner)) {
        let (dir, _provisioner) = workspace;
        let stats = Arc::new(ConnectionStats::default());
        let handle = ConnectionHandle {
            path: dir.path().to_path_buf(),
        };

        let err = handle.open(&stats).unwrap_err();
        assert!(matches!(err, DbError::Connection { .. }));
        assert_eq!(stats.opened(), 0);
    }

    #[rstest]
    fn test_with_entry_reads_named_connection_string() {
        let dir = tempdir().unwrap();
        let config = ConfigFile::default()
            .with_connection_string(DEFAULT_CONNECTION_NAME, "data/app.db")
            .with_connection_string("Reporting", "reports/r.db");
        let provisioner = Provisioner::new(Arc::new(config))
            .with_working_dir(dir.path())
            .with_entry("Reporting");

        assert_eq!(
            provisioner.database_path().unwrap(),
            dir.path().join("reports/r.db")
        );
        provisioner.open().unwrap();
        assert!(dir.path().join("reports/r.db").is_file());
        assert!(!dir.path().join("data").exists());
    }

    #[rstest]
    fn test_with_entry_missing_name() {
        let provisioner = Provisioner::new(Arc::new(ConfigFile::default())).with_entry("Reporting");
        let err = provisioner.resolve().unwrap_err();
        assert!(matches!(err, DbError::Configuration { ref name } if name == "Reporting"));
    }
}
