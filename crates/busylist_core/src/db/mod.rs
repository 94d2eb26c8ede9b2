//! SQLite connection bootstrap for BusyList core.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the persistence store.
//! - Describe where the database lives (`StorePath`).
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a busy timeout.
//! - Only the store module consumes connections opened here.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod open;

pub use open::{open_connection, open_connection_in_memory};

/// Default database file name used by FFI/CLI callers.
pub const DATABASE_FILE_NAME: &str = "busylist.db3";

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Backing location of the store database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorePath {
    /// SQLite file on disk. Created when missing.
    File(PathBuf),
    /// Private in-memory database, dropped with the connection.
    Memory,
}

impl StorePath {
    /// Resolves the default database file inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::File(dir.as_ref().join(DATABASE_FILE_NAME))
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StorePath, DATABASE_FILE_NAME};
    use std::path::Path;

    #[test]
    fn in_dir_appends_default_file_name() {
        let path = StorePath::in_dir("/data/app");
        assert_eq!(
            path,
            StorePath::File(Path::new("/data/app").join(DATABASE_FILE_NAME))
        );
    }
}
