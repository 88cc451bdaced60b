#![cfg(feature = "sqlite")]

use chrono::NaiveDate;
use obra_plan::{
    Project, ProjectMetadata, ProjectStore, SqliteProjectStore, TaskCatalog,
};
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn build_sample_project(catalog: Arc<TaskCatalog>) -> Project {
    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "Obra Sintra".into();
    metadata.address = "Rua do Castelo 9".into();
    metadata.area_m2 = 12.0;
    metadata.start_date = d(2024, 9, 2);

    let mut project = Project::new_with_metadata(catalog, metadata);
    project.select("remocao_armarios_loicas");
    project.select("demolicoes_rocos");
    project.select("eletricidades");
    project.refresh().unwrap();
    project
}

#[test]
fn fresh_store_loads_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProjectStore::new(dir.path().join("plan.db")).unwrap();

    let loaded = store.load_project(Arc::new(TaskCatalog::standard())).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn save_then_load_round_trips_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProjectStore::new(dir.path().join("plan.db")).unwrap();
    let catalog = Arc::new(TaskCatalog::standard());
    let project = build_sample_project(catalog.clone());

    store.save_project(&project).unwrap();
    let loaded = store.load_project(catalog).unwrap().unwrap();

    assert_eq!(loaded.metadata(), project.metadata());
    assert_eq!(loaded.selection(), project.selection());
    assert_eq!(loaded.calendar(), project.calendar());
}

#[test]
fn saving_again_replaces_the_stored_project() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteProjectStore::new(dir.path().join("plan.db")).unwrap();
    let catalog = Arc::new(TaskCatalog::standard());

    let first = build_sample_project(catalog.clone());
    store.save_project(&first).unwrap();

    let mut metadata = ProjectMetadata::default();
    metadata.project_name = "Obra Braga".into();
    let mut second = Project::new_with_metadata(catalog.clone(), metadata);
    second.select("pintura");
    store.save_project(&second).unwrap();

    let loaded = store.load_project(catalog).unwrap().unwrap();
    assert_eq!(loaded.metadata().project_name, "Obra Braga");
    assert_eq!(loaded.selection(), ["pintura"]);
    assert!(loaded.calendar().is_none());
}
