use std::collections::HashSet;

use crate::catalog::TaskCatalog;

/// Floor area, in m², of one scheduling unit. Base durations are declared
/// per unit; a 12 m² room scales every base duration by 3.
pub const UNIT_AREA_M2: f64 = 4.0;

/// Base duration applied to selected tasks the catalog does not know.
/// Deliberately permissive: unknown identifiers are scheduled, not
/// rejected, so a selection never fails at this stage.
pub const DEFAULT_BASE_DURATION: f64 = 1.0;

/// A selected task paired with its computed duration in days, rounded to
/// one decimal place.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationEntry {
    pub task: String,
    pub days: f64,
}

/// Computed durations for one project run, ordered the way the scheduler
/// will visit them: catalog declaration order first, then any selected
/// tasks the catalog does not know, in selection order. Immutable once
/// derived.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DurationMap {
    entries: Vec<DurationEntry>,
}

impl DurationMap {
    pub fn entries(&self) -> &[DurationEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &DurationEntry> {
        self.entries.iter()
    }

    pub fn get(&self, task: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.task == task)
            .map(|e| e.days)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.task.as_str())
    }
}

/// Derives per-task durations from the floor area.
///
/// `units = area_m2 / 4`; each selected task gets `base_duration * units`
/// days, rounded to one decimal place (half away from zero). Tasks missing
/// from the catalog fall back to [`DEFAULT_BASE_DURATION`].
///
/// Pure: no validation, no side effects. Duplicate selections collapse to
/// one entry.
pub fn compute_durations(
    catalog: &TaskCatalog,
    area_m2: f64,
    selected: &[String],
) -> DurationMap {
    let units = area_m2 / UNIT_AREA_M2;
    let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();

    let mut entries = Vec::with_capacity(selected_set.len());
    for definition in catalog.tasks() {
        if selected_set.contains(definition.id.as_str()) {
            entries.push(DurationEntry {
                task: definition.id.clone(),
                days: round_tenths(definition.base_duration * units),
            });
        }
    }

    // Unknown identifiers keep their selection order after the catalog ones.
    let mut appended: HashSet<&str> = HashSet::new();
    for task in selected {
        if !catalog.contains(task) && appended.insert(task.as_str()) {
            entries.push(DurationEntry {
                task: task.clone(),
                days: round_tenths(DEFAULT_BASE_DURATION * units),
            });
        }
    }

    DurationMap { entries }
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
