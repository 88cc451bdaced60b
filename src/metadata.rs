use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-project metadata collected before planning: site identification,
/// floor area, the materials-arrival date scheduling starts from, and the
/// contractual deadline. The deadline is informational; the scheduler does
/// not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    pub address: String,
    pub work_type: String,
    pub area_m2: f64,
    pub start_date: NaiveDate,
    pub deadline: NaiveDate,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "New Project".to_string(),
            address: "No address".to_string(),
            work_type: "renovation".to_string(),
            area_m2: 4.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            deadline: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        }
    }
}
