use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;

use crate::schedule::Calendar;

/// Human-readable task label for charts and reports:
/// `assentamento_soalho` becomes "Assentamento soalho".
pub fn display_label(task: &str) -> String {
    let spaced = task.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

/// Tabular view of a calendar for the rendering collaborator: one row per
/// scheduled task, insertion order preserved, `start`/`end` as date
/// columns and the occupied whole-day count alongside.
pub fn gantt_frame(calendar: &Calendar) -> PolarsResult<DataFrame> {
    let tasks: Vec<&str> = calendar.iter().map(|e| e.task.as_str()).collect();
    let labels: Vec<String> = calendar.iter().map(|e| display_label(&e.task)).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let starts: Vec<i32> = calendar.iter().map(|e| date_to_i32(e.start)).collect();
    let ends: Vec<i32> = calendar.iter().map(|e| date_to_i32(e.end)).collect();
    let durations: Vec<i64> = calendar.iter().map(|e| e.duration_days()).collect();

    let columns = vec![
        Series::new(PlSmallStr::from_static("task"), tasks).into_column(),
        Series::new(PlSmallStr::from_static("label"), labels).into_column(),
        Series::new(PlSmallStr::from_static("start"), starts)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("end"), ends)
            .cast(&DataType::Date)?
            .into_column(),
        Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
    ];

    DataFrame::new(columns)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}
