//! Connection configuration and lifetime strategy for the `SQLite` adapter.
//!
//! In-memory and private temporary databases only live as long as their
//! connection, so one is held for the repository's whole lifetime.
//! File-backed databases open a fresh connection per operation and close it
//! when the operation returns.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::task::ports::{TaskRepositoryError, TaskRepositoryResult};

const IN_MEMORY: &str = ":memory:";

/// Where the task database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A private in-memory database, destroyed when the repository is dropped.
    InMemory,
    /// A database file on disk.
    File(PathBuf),
}

impl DatabaseLocation {
    /// Parses a location, treating `:memory:` as the in-memory database.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == IN_MEMORY {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    /// Returns the file path for locations backed by a file on disk.
    ///
    /// Connection-scoped locations have no path of their own.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) if !is_private_file_location(path) => Some(path),
            _ => None,
        }
    }

    /// Returns `true` when the database only lives as long as its connection.
    ///
    /// Covers `:memory:`, the empty path (a private temporary database), and
    /// `file:` URIs opened with `mode=memory`.
    #[must_use]
    pub fn is_connection_scoped(&self) -> bool {
        match self {
            Self::InMemory => true,
            Self::File(path) => is_private_file_location(path),
        }
    }

    fn database_url(&self) -> String {
        match self {
            Self::InMemory => IN_MEMORY.to_owned(),
            Self::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

fn is_private_file_location(path: &Path) -> bool {
    let Some(raw) = path.to_str() else {
        return false;
    };
    if raw.is_empty() {
        return true;
    }
    let Some(uri) = raw.strip_prefix("file:") else {
        return false;
    };
    if uri.starts_with(IN_MEMORY) {
        return true;
    }
    uri.split_once('?').is_some_and(|(_, query)| {
        query
            .split('&')
            .any(|parameter| parameter.eq_ignore_ascii_case("mode=memory"))
    })
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InMemory => f.write_str(IN_MEMORY),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Configuration for opening a `SQLite` task repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConfig {
    location: DatabaseLocation,
    busy_timeout_ms: u32,
    auto_create_schema: bool,
}

impl SqliteConfig {
    /// Default time a writer waits on a locked database, in milliseconds.
    pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

    /// Creates a configuration for the given location with default settings.
    #[must_use]
    pub const fn new(location: DatabaseLocation) -> Self {
        Self {
            location,
            busy_timeout_ms: Self::DEFAULT_BUSY_TIMEOUT_MS,
            auto_create_schema: true,
        }
    }

    /// Creates a configuration for a private in-memory database.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self::new(DatabaseLocation::InMemory)
    }

    /// Creates a configuration for a database file.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DatabaseLocation::File(path.into()))
    }

    /// Sets the busy timeout applied to every connection.
    #[must_use]
    pub const fn with_busy_timeout_ms(mut self, busy_timeout_ms: u32) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    /// Sets whether opening the repository creates the schema.
    #[must_use]
    pub const fn with_auto_create_schema(mut self, auto_create_schema: bool) -> Self {
        self.auto_create_schema = auto_create_schema;
        self
    }

    /// Returns the database location.
    #[must_use]
    pub const fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Returns the busy timeout in milliseconds.
    #[must_use]
    pub const fn busy_timeout_ms(&self) -> u32 {
        self.busy_timeout_ms
    }

    /// Returns whether opening the repository creates the schema.
    #[must_use]
    pub const fn auto_create_schema(&self) -> bool {
        self.auto_create_schema
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Opens and configures a single `SQLite` connection.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when the database cannot be
/// opened or the connection pragmas fail.
pub fn establish(config: &SqliteConfig) -> TaskRepositoryResult<SqliteConnection> {
    let url = config.location.database_url();
    let mut connection =
        SqliteConnection::establish(&url).map_err(TaskRepositoryError::persistence)?;
    connection
        .batch_execute(&format!(
            "PRAGMA foreign_keys = ON;\
             PRAGMA busy_timeout = {};\
             PRAGMA journal_mode = WAL;\
             PRAGMA synchronous = NORMAL;",
            config.busy_timeout_ms
        ))
        .map_err(TaskRepositoryError::persistence)?;
    tracing::debug!(location = %config.location, "opened sqlite connection");
    Ok(connection)
}

/// Connection strategy selected once when the repository is constructed.
#[derive(Clone)]
pub(super) enum ConnectionProvider {
    /// One connection shared for the repository's lifetime.
    Session(Arc<Mutex<SqliteConnection>>),
    /// A new connection for every operation.
    PerCall(SqliteConfig),
}

impl ConnectionProvider {
    /// Picks the strategy matching the configured location.
    ///
    /// Connection-scoped databases keep one connection for the provider's
    /// lifetime; everything else connects per call.
    pub(super) fn for_config(config: &SqliteConfig) -> TaskRepositoryResult<Self> {
        if config.location.is_connection_scoped() {
            let connection = establish(config)?;
            Ok(Self::Session(Arc::new(Mutex::new(connection))))
        } else {
            Ok(Self::PerCall(config.clone()))
        }
    }

    /// Runs `f` against a connection chosen by the active strategy.
    pub(super) fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T>,
    ) -> TaskRepositoryResult<T> {
        match self {
            Self::Session(shared) => {
                let mut guard = shared.lock().map_err(|err| {
                    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
                })?;
                f(&mut *guard)
            }
            Self::PerCall(config) => {
                let mut connection = establish(config)?;
                f(&mut connection)
            }
        }
    }
}

impl fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(_) => f.write_str("ConnectionProvider::Session"),
            Self::PerCall(config) => f
                .debug_tuple("ConnectionProvider::PerCall")
                .field(config.location())
                .finish(),
        }
    }
}
