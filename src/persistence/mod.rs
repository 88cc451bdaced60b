use serde_json::Error as SerdeJsonError;
use std::collections::HashSet;
use std::fmt;
use std::io;
use std::sync::Arc;

use crate::catalog::TaskCatalog;
use crate::schedule::{Calendar, Project};

#[derive(Debug)]
pub enum PersistenceError {
    Serialization(SerdeJsonError),
    Io(io::Error),
    Csv(csv::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    InvalidData(String),
    NotFound,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            PersistenceError::NotFound => write!(f, "no project stored"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable storage for one project plan. Loading needs the shared catalog
/// to rebuild the project around it; the catalog itself is configuration,
/// not stored state.
pub trait ProjectStore {
    fn save_project(&self, project: &Project) -> PersistenceResult<()>;
    fn load_project(&self, catalog: Arc<TaskCatalog>) -> PersistenceResult<Option<Project>>;
}

/// Structural checks on a calendar crossing a persistence boundary: no
/// duplicate tasks, every interval at least one day long.
pub fn validate_calendar(calendar: &Calendar) -> PersistenceResult<()> {
    let mut seen = HashSet::with_capacity(calendar.len());
    for entry in calendar {
        if !seen.insert(entry.task.as_str()) {
            return Err(PersistenceError::InvalidData(format!(
                "duplicate calendar entry for task '{}'",
                entry.task
            )));
        }
        if entry.end <= entry.start {
            return Err(PersistenceError::InvalidData(format!(
                "task '{}' has interval {} -> {} shorter than one day",
                entry.task, entry.start, entry.end
            )));
        }
    }
    Ok(())
}

#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod file;

pub use file::{
    load_calendar_from_csv, load_project_from_json, save_calendar_to_csv, save_project_to_json,
};
