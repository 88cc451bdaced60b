use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::calculations::fixed_point::FixedPoint;
use crate::catalog::TaskCatalog;
use crate::duration::{DurationMap, compute_durations};
use crate::metadata::ProjectMetadata;

/// One scheduled task: a half-open `[start, end)` date interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub task: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CalendarEntry {
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// The scheduler's output: task date intervals in the order tasks became
/// schedulable, which for a fixed catalog and selection is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Calendar {
    entries: Vec<CalendarEntry>,
}

impl Calendar {
    pub fn push(&mut self, entry: CalendarEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CalendarEntry> {
        self.entries.iter()
    }

    pub fn get(&self, task: &str) -> Option<&CalendarEntry> {
        self.entries.iter().find(|e| e.task == task)
    }

    pub fn contains(&self, task: &str) -> bool {
        self.get(task).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overall `(start, end)` span, or `None` for an empty calendar.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.entries.iter().map(|e| e.start).min()?;
        let end = self.entries.iter().map(|e| e.end).max()?;
        Some((start, end))
    }
}

impl<'a> IntoIterator for &'a Calendar {
    type Item = &'a CalendarEntry;
    type IntoIter = std::slice::Iter<'a, CalendarEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug)]
pub enum ScheduleError {
    /// The caller selected zero tasks. Distinct from a vacuous empty
    /// calendar so "no work" is never mistaken for success.
    EmptySelection,
    /// The fixed point stalled before every selected task was placed. Only
    /// a cycle within the selected subgraph can cause this; prerequisites
    /// outside the selection are ignored.
    UnresolvedDependencies {
        partial: Calendar,
        unscheduled: Vec<String>,
        cycle: Vec<String>,
    },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::EmptySelection => {
                write!(f, "nothing to schedule: no tasks selected")
            }
            ScheduleError::UnresolvedDependencies {
                unscheduled, cycle, ..
            } => {
                write!(
                    f,
                    "unresolved dependencies: {} task(s) could not be placed ({})",
                    unscheduled.len(),
                    unscheduled.join(", ")
                )?;
                if !cycle.is_empty() {
                    write!(f, "; dependency cycle among: {}", cycle.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Outcome of a successful [`Project::refresh`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub scheduled_tasks: usize,
    pub starts_on: NaiveDate,
    pub finishes_on: NaiveDate,
    pub total_days: i64,
    /// Selected identifiers the catalog did not know; they were scheduled
    /// with the default base duration.
    pub defaulted_tasks: Vec<String>,
}

impl RefreshSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut summary = format!(
            "{} tasks, {} -> {}, {} days",
            self.scheduled_tasks, self.starts_on, self.finishes_on, self.total_days
        );
        if !self.defaulted_tasks.is_empty() {
            summary.push_str(&format!(
                ", {} unknown task(s) defaulted",
                self.defaulted_tasks.len()
            ));
        }
        summary
    }
}

/// One renovation project: metadata, the task selection, and the computed
/// duration map and calendar. The catalog is shared read-only; all mutable
/// state here is project-local.
pub struct Project {
    catalog: Arc<TaskCatalog>,
    metadata: ProjectMetadata,
    selection: Vec<String>,
    durations: Option<DurationMap>,
    calendar: Option<Calendar>,
}

impl Project {
    pub fn new(catalog: Arc<TaskCatalog>) -> Self {
        Self::new_with_metadata(catalog, ProjectMetadata::default())
    }

    pub fn new_with_metadata(catalog: Arc<TaskCatalog>, metadata: ProjectMetadata) -> Self {
        Self {
            catalog,
            metadata,
            selection: Vec::new(),
            durations: None,
            calendar: None,
        }
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    /// Replaces the metadata and discards any computed schedule, since
    /// durations depend on the area and dates on the start date.
    pub fn set_metadata(&mut self, metadata: ProjectMetadata) {
        self.metadata = metadata;
        self.invalidate();
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Adds a task to the selection. Unknown identifiers are accepted; the
    /// duration calculator applies the default base duration to them.
    /// Returns false if the task was already selected.
    pub fn select(&mut self, task: impl Into<String>) -> bool {
        let task = task.into();
        if self.selection.contains(&task) {
            return false;
        }
        self.selection.push(task);
        self.invalidate();
        true
    }

    pub fn deselect(&mut self, task: &str) -> bool {
        let before = self.selection.len();
        self.selection.retain(|t| t != task);
        let removed = self.selection.len() != before;
        if removed {
            self.invalidate();
        }
        removed
    }

    /// Selects every catalog task, in declaration order.
    pub fn select_all(&mut self) {
        self.selection = self
            .catalog
            .tasks()
            .iter()
            .map(|t| t.id.clone())
            .collect();
        self.invalidate();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.invalidate();
    }

    pub fn durations(&self) -> Option<&DurationMap> {
        self.durations.as_ref()
    }

    pub fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    /// Reattaches a previously computed calendar, e.g. when loading a
    /// stored project snapshot. The calendar is not recomputed.
    pub fn restore_calendar(&mut self, calendar: Calendar) {
        self.calendar = Some(calendar);
    }

    /// Recomputes durations from the floor area and runs the scheduler.
    /// On failure nothing is stored and the error carries the partial
    /// calendar for diagnostics.
    pub fn refresh(&mut self) -> Result<RefreshSummary, ScheduleError> {
        let durations =
            compute_durations(&self.catalog, self.metadata.area_m2, &self.selection);
        let calendar =
            FixedPoint::new(&self.catalog).execute(&durations, self.metadata.start_date, &self.selection)?;

        let (starts_on, finishes_on) = calendar
            .span()
            .unwrap_or((self.metadata.start_date, self.metadata.start_date));
        let mut defaulted_tasks = Vec::new();
        for task in &self.selection {
            if !self.catalog.contains(task) && !defaulted_tasks.contains(task) {
                defaulted_tasks.push(task.clone());
            }
        }

        let summary = RefreshSummary {
            scheduled_tasks: calendar.len(),
            starts_on,
            finishes_on,
            total_days: (finishes_on - starts_on).num_days(),
            defaulted_tasks,
        };

        self.durations = Some(durations);
        self.calendar = Some(calendar);
        Ok(summary)
    }

    fn invalidate(&mut self) {
        self.durations = None;
        self.calendar = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn refresh_invalidated_by_selection_change() {
        let mut project = Project::new(Arc::new(TaskCatalog::standard()));
        project.select("demolicoes_rocos");
        project.refresh().unwrap();
        assert!(project.calendar().is_some());

        project.select("canalizacoes");
        assert!(project.calendar().is_none());
    }

    #[test]
    fn calendar_span_covers_all_entries() {
        let mut calendar = Calendar::default();
        calendar.push(CalendarEntry {
            task: "a".into(),
            start: d(2024, 1, 1),
            end: d(2024, 1, 3),
        });
        calendar.push(CalendarEntry {
            task: "b".into(),
            start: d(2024, 1, 3),
            end: d(2024, 1, 4),
        });
        assert_eq!(calendar.span(), Some((d(2024, 1, 1), d(2024, 1, 4))));
    }
}
