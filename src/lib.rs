pub mod calculations;
pub mod catalog;
pub mod chart;
pub mod duration;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod persistence;
pub mod report;
pub mod schedule;

pub use calculations::fixed_point::FixedPoint;
pub use catalog::{CatalogError, CrewRoster, CrewSpecialty, TaskCatalog, TaskDefinition};
pub use chart::{display_label, gantt_frame};
pub use duration::{
    DEFAULT_BASE_DURATION, DurationEntry, DurationMap, UNIT_AREA_M2, compute_durations,
};
pub use graph::SelectionGraph;
pub use metadata::ProjectMetadata;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteProjectStore;
pub use persistence::{
    PersistenceError, ProjectStore, load_calendar_from_csv, load_project_from_json,
    save_calendar_to_csv, save_project_to_json, validate_calendar,
};
pub use report::{ENTRIES_PER_PAGE, PAGE_BREAK, render_report, report_path, write_report};
pub use schedule::{Calendar, CalendarEntry, Project, RefreshSummary, ScheduleError};
