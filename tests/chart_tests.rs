use chrono::NaiveDate;
use obra_plan::{FixedPoint, TaskCatalog, compute_durations, display_label, gantt_frame};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn to_epoch_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

#[test]
fn gantt_frame_carries_one_row_per_entry_in_schedule_order() {
    let catalog = TaskCatalog::standard();
    let tasks: Vec<String> = ["demolicoes_rocos", "canalizacoes"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let durations = compute_durations(&catalog, 4.0, &tasks);
    let calendar = FixedPoint::new(&catalog)
        .execute(&durations, d(2024, 1, 1), &tasks)
        .unwrap();

    let df = gantt_frame(&calendar).unwrap();
    assert_eq!(df.height(), 2);
    for column in ["task", "label", "start", "end", "duration_days"] {
        assert!(df.column(column).is_ok(), "missing column {column}");
    }

    let task_col = df.column("task").unwrap().str().unwrap();
    assert_eq!(task_col.get(0), Some("demolicoes_rocos"));
    assert_eq!(task_col.get(1), Some("canalizacoes"));

    let labels = df.column("label").unwrap().str().unwrap();
    assert_eq!(labels.get(0), Some("Demolicoes rocos"));

    let starts = df.column("start").unwrap().date().unwrap();
    let ends = df.column("end").unwrap().date().unwrap();
    assert_eq!(starts.get(0), Some(to_epoch_days(d(2024, 1, 1))));
    assert_eq!(ends.get(0), Some(to_epoch_days(d(2024, 1, 2))));
    assert_eq!(starts.get(1), Some(to_epoch_days(d(2024, 1, 2))));
    assert_eq!(ends.get(1), Some(to_epoch_days(d(2024, 1, 3))));

    let durations_col = df.column("duration_days").unwrap().i64().unwrap();
    assert_eq!(durations_col.get(0), Some(1));
    assert_eq!(durations_col.get(1), Some(1));
}

#[test]
fn empty_calendar_yields_an_empty_frame() {
    let calendar = obra_plan::Calendar::default();
    let df = gantt_frame(&calendar).unwrap();
    assert_eq!(df.height(), 0);
}

#[test]
fn labels_are_human_readable() {
    assert_eq!(display_label("teto_falso_montagem"), "Teto falso montagem");
    assert_eq!(display_label("pintura"), "Pintura");
}
