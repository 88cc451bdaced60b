use chrono::NaiveDate;
use obra_plan::{
    PersistenceError, Project, ProjectMetadata, TaskCatalog, load_calendar_from_csv,
    load_project_from_json, save_calendar_to_csv, save_project_to_json,
};
use std::sync::Arc;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn build_sample_project(catalog: Arc<TaskCatalog>) -> Project {
    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "Remodelacao Cozinha".into();
    metadata.address = "Av. Central 3, Porto".into();
    metadata.work_type = "cozinha".into();
    metadata.area_m2 = 8.0;
    metadata.start_date = d(2024, 5, 6);
    metadata.deadline = d(2024, 7, 31);

    let mut project = Project::new_with_metadata(catalog, metadata);
    project.select("remocao_armarios_loicas");
    project.select("demolicoes_rocos");
    project.select("canalizacoes");
    project.refresh().unwrap();
    project
}

#[test]
fn json_round_trip_preserves_the_project() {
    let catalog = Arc::new(TaskCatalog::standard());
    let project = build_sample_project(catalog.clone());
    let file = NamedTempFile::new().unwrap();

    save_project_to_json(&project, file.path()).unwrap();
    let loaded = load_project_from_json(file.path(), catalog).unwrap();

    assert_eq!(loaded.metadata(), project.metadata());
    assert_eq!(loaded.selection(), project.selection());
    assert_eq!(loaded.calendar(), project.calendar());
}

#[test]
fn unscheduled_project_round_trips_without_a_calendar() {
    let catalog = Arc::new(TaskCatalog::standard());
    let mut project = Project::new(catalog.clone());
    project.select("pintura");
    let file = NamedTempFile::new().unwrap();

    save_project_to_json(&project, file.path()).unwrap();
    let loaded = load_project_from_json(file.path(), catalog).unwrap();

    assert_eq!(loaded.selection(), ["pintura"]);
    assert!(loaded.calendar().is_none());
}

#[test]
fn csv_round_trip_preserves_entry_order_and_dates() {
    let catalog = Arc::new(TaskCatalog::standard());
    let project = build_sample_project(catalog);
    let calendar = project.calendar().unwrap();
    let file = NamedTempFile::new().unwrap();

    save_calendar_to_csv(calendar, file.path()).unwrap();
    let loaded = load_calendar_from_csv(file.path()).unwrap();

    assert_eq!(&loaded, calendar);
    // 8 m² doubles base durations: demolicoes_rocos occupies two days.
    let demolicoes = loaded.get("demolicoes_rocos").unwrap();
    assert_eq!(demolicoes.duration_days(), 2);
}

#[test]
fn empty_csv_is_invalid_data() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "task,start,end\n").unwrap();

    match load_calendar_from_csv(file.path()) {
        Err(PersistenceError::InvalidData(msg)) => {
            assert!(msg.contains("no calendar entries"));
        }
        other => panic!("expected InvalidData, got {:?}", other.map(|c| c.len())),
    }
}

#[test]
fn malformed_dates_are_rejected() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "task,start,end\npintura,2024-13-40,2024-01-02\n").unwrap();

    match load_calendar_from_csv(file.path()) {
        Err(PersistenceError::InvalidData(msg)) => assert!(msg.contains("invalid date")),
        other => panic!("expected InvalidData, got {:?}", other.map(|c| c.len())),
    }
}
