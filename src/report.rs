use std::fs;
use std::path::{Path, PathBuf};

use crate::chart::display_label;
use crate::metadata::ProjectMetadata;
use crate::persistence::PersistenceResult;
use crate::schedule::Calendar;

/// Schedule lines per page of the fixed-layout report.
pub const ENTRIES_PER_PAGE: usize = 20;

/// Separates pages in the rendered document.
pub const PAGE_BREAK: char = '\u{c}';

/// Renders the schedule as a paginated plain-text document. Every page
/// carries the project header; entries overflow onto a new page after
/// [`ENTRIES_PER_PAGE`] lines.
pub fn render_report(calendar: &Calendar, metadata: &ProjectMetadata) -> String {
    let entries = calendar.entries();
    let total_pages = entries.len().div_ceil(ENTRIES_PER_PAGE).max(1);

    let mut pages = Vec::with_capacity(total_pages);
    for page in 0..total_pages {
        let mut text = String::new();
        text.push_str(&format!(
            "Cronograma da Obra: {} - {}\n",
            metadata.project_name, metadata.address
        ));
        text.push_str(&format!(
            "Tipo de obra: {} | Area: {} m2\n",
            metadata.work_type, metadata.area_m2
        ));
        text.push_str(&format!("Pagina {} de {}\n", page + 1, total_pages));
        text.push_str(&"-".repeat(60));
        text.push('\n');

        let chunk = entries
            .iter()
            .skip(page * ENTRIES_PER_PAGE)
            .take(ENTRIES_PER_PAGE);
        let mut wrote_any = false;
        for entry in chunk {
            text.push_str(&format!(
                "{}: {} -> {}\n",
                display_label(&entry.task),
                entry.start.format("%Y-%m-%d"),
                entry.end.format("%Y-%m-%d")
            ));
            wrote_any = true;
        }
        if !wrote_any {
            text.push_str("(sem tarefas agendadas)\n");
        }
        pages.push(text);
    }

    pages.join(&PAGE_BREAK.to_string())
}

/// Output path for a project's report, derived from the project name:
/// lowercased, non-alphanumerics collapsed to underscores.
pub fn report_path(dir: &Path, project_name: &str) -> PathBuf {
    let mut slug = String::with_capacity(project_name.len());
    let mut last_was_sep = true;
    for ch in project_name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    let slug = slug.trim_end_matches('_');
    let slug = if slug.is_empty() { "projeto" } else { slug };
    dir.join(format!("cronograma_{slug}.txt"))
}

/// Writes the paginated report next to the caller's chosen directory and
/// returns the path it landed on.
pub fn write_report(
    calendar: &Calendar,
    metadata: &ProjectMetadata,
    dir: &Path,
) -> PersistenceResult<PathBuf> {
    let path = report_path(dir, &metadata.project_name);
    fs::write(&path, render_report(calendar, metadata))?;
    Ok(path)
}
