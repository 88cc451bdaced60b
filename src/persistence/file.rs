use super::{PersistenceError, PersistenceResult};
use crate::catalog::TaskCatalog;
use crate::metadata::ProjectMetadata;
use crate::schedule::{Calendar, CalendarEntry, Project};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
struct ProjectSnapshot {
    metadata: ProjectMetadata,
    selection: Vec<String>,
    calendar: Option<Calendar>,
}

impl ProjectSnapshot {
    fn from_project(project: &Project) -> PersistenceResult<Self> {
        if let Some(calendar) = project.calendar() {
            super::validate_calendar(calendar)?;
        }
        Ok(Self {
            metadata: project.metadata().clone(),
            selection: project.selection().to_vec(),
            calendar: project.calendar().cloned(),
        })
    }

    fn into_project(self, catalog: Arc<TaskCatalog>) -> PersistenceResult<Project> {
        if let Some(calendar) = &self.calendar {
            super::validate_calendar(calendar)?;
        }
        let mut project = Project::new_with_metadata(catalog, self.metadata);
        for task in self.selection {
            project.select(task);
        }
        if let Some(calendar) = self.calendar {
            project.restore_calendar(calendar);
        }
        Ok(project)
    }
}

pub fn save_project_to_json<P: AsRef<Path>>(
    project: &Project,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ProjectSnapshot::from_project(project)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_project_from_json<P: AsRef<Path>>(
    path: P,
    catalog: Arc<TaskCatalog>,
) -> PersistenceResult<Project> {
    let file = File::open(path)?;
    let snapshot: ProjectSnapshot = serde_json::from_reader(file)?;
    snapshot.into_project(catalog)
}

#[derive(Serialize, Deserialize)]
struct CalendarCsvRecord {
    task: String,
    start: String,
    end: String,
}

impl From<&CalendarEntry> for CalendarCsvRecord {
    fn from(entry: &CalendarEntry) -> Self {
        Self {
            task: entry.task.clone(),
            start: format_date(entry.start),
            end: format_date(entry.end),
        }
    }
}

impl CalendarCsvRecord {
    fn into_entry(self) -> PersistenceResult<CalendarEntry> {
        Ok(CalendarEntry {
            task: self.task,
            start: parse_date(&self.start)?,
            end: parse_date(&self.end)?,
        })
    }
}

pub fn save_calendar_to_csv<P: AsRef<Path>>(
    calendar: &Calendar,
    path: P,
) -> PersistenceResult<()> {
    super::validate_calendar(calendar)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in calendar {
        writer.serialize(CalendarCsvRecord::from(entry))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_calendar_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Calendar> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut calendar = Calendar::default();
    for record in reader.deserialize::<CalendarCsvRecord>() {
        let record = record?;
        calendar.push(record.into_entry()?);
    }

    if calendar.is_empty() {
        return Err(PersistenceError::InvalidData(
            "CSV file contained no calendar entries".into(),
        ));
    }

    super::validate_calendar(&calendar)?;
    Ok(calendar)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}
