use super::{PersistenceResult, ProjectStore};
use crate::catalog::TaskCatalog;
use crate::metadata::ProjectMetadata;
use crate::schedule::{Calendar, CalendarEntry, Project};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::{Arc, Mutex};

/// Single-project sqlite store: metadata, the task selection, and the
/// computed calendar, each as JSON payload rows. Selection and calendar
/// rows keep an explicit position so insertion order survives the round
/// trip.
pub struct SqliteProjectStore {
    connection: Mutex<Connection>,
}

impl SqliteProjectStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS project_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS selection (
                position INTEGER PRIMARY KEY,
                task TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS calendar_entries (
                position INTEGER PRIMARY KEY,
                entry_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(
        &self,
        tx: &rusqlite::Transaction,
        metadata: &ProjectMetadata,
    ) -> PersistenceResult<()> {
        let json = serde_json::to_string(metadata)?;
        tx.execute("DELETE FROM project_metadata", [])?;
        tx.execute(
            "INSERT INTO project_metadata (id, metadata_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_selection(
        &self,
        tx: &rusqlite::Transaction,
        selection: &[String],
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM selection", [])?;
        let mut stmt = tx.prepare("INSERT INTO selection (position, task) VALUES (?1, ?2)")?;
        for (position, task) in selection.iter().enumerate() {
            stmt.execute(params![position as i64, task])?;
        }
        Ok(())
    }

    fn save_calendar(
        &self,
        tx: &rusqlite::Transaction,
        calendar: Option<&Calendar>,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM calendar_entries", [])?;
        let Some(calendar) = calendar else {
            return Ok(());
        };
        let mut stmt =
            tx.prepare("INSERT INTO calendar_entries (position, entry_json) VALUES (?1, ?2)")?;
        for (position, entry) in calendar.iter().enumerate() {
            let json = serde_json::to_string(entry)?;
            stmt.execute(params![position as i64, json])?;
        }
        Ok(())
    }
}

impl ProjectStore for SqliteProjectStore {
    fn save_project(&self, project: &Project) -> PersistenceResult<()> {
        if let Some(calendar) = project.calendar() {
            super::validate_calendar(calendar)?;
        }
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_metadata(&tx, project.metadata())?;
        self.save_selection(&tx, project.selection())?;
        self.save_calendar(&tx, project.calendar())?;
        tx.commit()?;
        Ok(())
    }

    fn load_project(&self, catalog: Arc<TaskCatalog>) -> PersistenceResult<Option<Project>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT metadata_json FROM project_metadata WHERE id = 1")?;
        let metadata_json_opt: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;

        let Some(metadata_json) = metadata_json_opt else {
            return Ok(None);
        };

        let metadata: ProjectMetadata = serde_json::from_str(&metadata_json)?;

        let mut stmt = conn.prepare("SELECT task FROM selection ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut selection = Vec::new();
        for task in rows {
            selection.push(task?);
        }

        let mut stmt =
            conn.prepare("SELECT entry_json FROM calendar_entries ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut calendar = Calendar::default();
        for json in rows {
            let entry: CalendarEntry = serde_json::from_str(&json?)?;
            calendar.push(entry);
        }

        if !calendar.is_empty() {
            super::validate_calendar(&calendar)?;
        }

        let mut project = Project::new_with_metadata(catalog, metadata);
        for task in selection {
            project.select(task);
        }
        if !calendar.is_empty() {
            project.restore_calendar(calendar);
        }

        Ok(Some(project))
    }
}
