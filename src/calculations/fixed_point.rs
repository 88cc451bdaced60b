use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::catalog::TaskCatalog;
use crate::duration::DurationMap;
use crate::graph::SelectionGraph;
use crate::schedule::{Calendar, CalendarEntry, ScheduleError};

/// Fixed-point scheduling engine.
///
/// Repeats rounds over the duration map in declaration order, placing every
/// task whose selected prerequisites are already complete and advancing a
/// single global date cursor past it. Tasks are therefore strictly
/// sequential even where the dependency structure would allow overlap.
/// A round that places nothing while tasks remain means the selected
/// subgraph contains a cycle, and scheduling fails with the partial
/// calendar accumulated so far.
pub struct FixedPoint<'a> {
    catalog: &'a TaskCatalog,
}

impl<'a> FixedPoint<'a> {
    pub fn new(catalog: &'a TaskCatalog) -> Self {
        Self { catalog }
    }

    pub fn execute(
        &self,
        durations: &DurationMap,
        start_date: NaiveDate,
        selected: &[String],
    ) -> Result<Calendar, ScheduleError> {
        if durations.is_empty() {
            return Err(ScheduleError::EmptySelection);
        }

        let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();
        let mut calendar = Calendar::default();
        let mut completed: HashSet<&str> = HashSet::with_capacity(durations.len());
        let mut cursor = start_date;

        while completed.len() < durations.len() {
            let mut progressed = false;

            for entry in durations.iter() {
                if completed.contains(entry.task.as_str()) {
                    continue;
                }

                // Prerequisites outside the selection are treated as already
                // satisfied, not waited on.
                let ready = self
                    .catalog
                    .prerequisites(&entry.task)
                    .iter()
                    .filter(|dep| selected_set.contains(dep.as_str()))
                    .all(|dep| completed.contains(dep.as_str()));

                if ready {
                    let days = duration_days(entry.days);
                    let end = cursor + Duration::days(days);
                    calendar.push(CalendarEntry {
                        task: entry.task.clone(),
                        start: cursor,
                        end,
                    });
                    cursor = end;
                    completed.insert(entry.task.as_str());
                    progressed = true;
                }
            }

            if !progressed {
                let unscheduled: Vec<String> = durations
                    .iter()
                    .filter(|e| !completed.contains(e.task.as_str()))
                    .map(|e| e.task.clone())
                    .collect();
                let cycle = SelectionGraph::build(self.catalog, selected).cycle_members();
                return Err(ScheduleError::UnresolvedDependencies {
                    partial: calendar,
                    unscheduled,
                    cycle,
                });
            }
        }

        Ok(calendar)
    }
}

/// Calendar days occupied by a computed duration: the rounded duration
/// truncated to whole days, floored at one day so sub-day tasks still
/// advance the cursor.
pub(crate) fn duration_days(duration: f64) -> i64 {
    (duration as i64).max(1)
}

#[cfg(test)]
mod tests {
    use super::duration_days;

    #[test]
    fn sub_day_durations_floor_at_one() {
        assert_eq!(duration_days(0.5), 1);
        assert_eq!(duration_days(0.0), 1);
    }

    #[test]
    fn fractional_days_truncate() {
        assert_eq!(duration_days(2.5), 2);
        assert_eq!(duration_days(1.0), 1);
    }
}
