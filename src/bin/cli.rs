use chrono::NaiveDate;
use obra_plan::{
    Project, TaskCatalog, gantt_frame, load_project_from_json, save_calendar_to_csv,
    save_project_to_json, write_report,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cell = |av: &AnyValue| -> String {
        match av {
            AnyValue::Null => String::new(),
            AnyValue::Int32(v) => v.to_string(),
            AnyValue::Int64(v) => v.to_string(),
            AnyValue::String(s) => s.to_string(),
            other => other.to_string(),
        }
    };

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = cell(av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col.get(row_idx).map(|ref av| cell(av)).unwrap_or_default();
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                         Show this help\n  tasks                        List catalog tasks and selection state\n  select <id> [id...]          Add tasks to the selection\n  unselect <id>                Remove a task from the selection\n  all                          Select every catalog task\n  none                         Clear the selection\n  area <m2>                    Set the floor area\n  start <YYYY-MM-DD>           Set the start date (materials arrival)\n  deadline <YYYY-MM-DD>        Set the contractual deadline\n  meta show                    Show project metadata\n  meta name <text...>          Set the project name\n  meta address <text...>       Set the site address\n  meta type <text...>          Set the work type\n  compute                      Derive durations and schedule the project\n  show                         Show the computed schedule\n  report [dir]                 Write the paginated text report\n  save <json|csv> <path>       Persist the project (json) or calendar (csv)\n  load <json_path>             Load a project snapshot\n  quit|exit                    Exit"
    );
}

fn print_catalog(project: &Project) {
    println!("Catalog tasks (base duration in days per 4 m²):");
    for definition in project.catalog().tasks() {
        let mark = if project.selection().contains(&definition.id) {
            "*"
        } else {
            " "
        };
        let prereqs = project.catalog().prerequisites(&definition.id);
        if prereqs.is_empty() {
            println!(" {mark} {:<32} {:>4}", definition.id, definition.base_duration);
        } else {
            println!(
                " {mark} {:<32} {:>4}  after: {}",
                definition.id,
                definition.base_duration,
                prereqs.join(", ")
            );
        }
    }
    let crews = project.catalog().crews();
    if !crews.specialties.is_empty() {
        let roster = crews
            .specialties
            .iter()
            .map(|c| format!("{} x{}", c.name, c.headcount))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Crews: {roster} (multiskilled masons: {})", crews.multiskilled_masons);
    }
}

fn print_metadata(project: &Project) {
    let metadata = project.metadata();
    println!("Project name : {}", metadata.project_name);
    println!("Address      : {}", metadata.address);
    println!("Work type    : {}", metadata.work_type);
    println!("Area (m²)    : {}", metadata.area_m2);
    println!("Start date   : {}", metadata.start_date);
    println!("Deadline     : {}", metadata.deadline);
}

fn print_schedule(project: &Project) {
    match project.calendar() {
        Some(calendar) => match gantt_frame(calendar) {
            Ok(df) => println!("{}", render_df_as_text_table(&df)),
            Err(e) => println!("Error rendering schedule: {e}"),
        },
        None => println!("No schedule computed yet. Use 'compute'."),
    }
}

fn main() {
    let catalog = Arc::new(TaskCatalog::standard());
    let mut project = Project::new(catalog.clone());

    println!("Obra Plan (CLI) - type 'help' for commands\n");
    print_metadata(&project);

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "tasks" => print_catalog(&project),
            "select" => {
                let ids: Vec<&str> = parts.collect();
                if ids.is_empty() {
                    println!("Usage: select <id> [id...]");
                    continue;
                }
                for id in ids {
                    if !catalog.contains(id) {
                        println!("Note: '{id}' is not in the catalog; default duration applies.");
                    }
                    if project.select(id) {
                        println!("Selected {id}.");
                    } else {
                        println!("{id} was already selected.");
                    }
                }
            }
            "unselect" => match parts.next() {
                Some(id) => {
                    if project.deselect(id) {
                        println!("Removed {id}.");
                    } else {
                        println!("{id} was not selected.");
                    }
                }
                None => println!("Usage: unselect <id>"),
            },
            "all" => {
                project.select_all();
                println!("Selected all {} catalog tasks.", project.selection().len());
            }
            "none" => {
                project.clear_selection();
                println!("Selection cleared.");
            }
            "area" => match parts.next().map(str::parse::<f64>) {
                Some(Ok(area)) if area > 0.0 => {
                    let mut metadata = project.metadata().clone();
                    metadata.area_m2 = area;
                    project.set_metadata(metadata);
                    println!("Area set to {area} m².");
                }
                Some(_) => println!("Invalid area (positive m² value expected)"),
                None => println!("Usage: area <m2>"),
            },
            "start" | "deadline" => match parts.next() {
                Some(date_s) => match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                    Ok(date) => {
                        let mut metadata = project.metadata().clone();
                        if cmd == "start" {
                            metadata.start_date = date;
                        } else {
                            metadata.deadline = date;
                        }
                        project.set_metadata(metadata);
                        println!("{cmd} set to {date}.");
                    }
                    Err(_) => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Usage: {cmd} <YYYY-MM-DD>"),
            },
            "meta" => match parts.next() {
                Some("show") => print_metadata(&project),
                Some(field @ ("name" | "address" | "type")) => {
                    let rest: Vec<&str> = parts.collect();
                    if rest.is_empty() {
                        println!("Usage: meta {field} <text...>");
                        continue;
                    }
                    let value = rest.join(" ");
                    let mut metadata = project.metadata().clone();
                    match field {
                        "name" => metadata.project_name = value,
                        "address" => metadata.address = value,
                        _ => metadata.work_type = value,
                    }
                    project.set_metadata(metadata);
                    println!("Metadata updated.");
                }
                _ => println!("Usage: meta show|name|address|type"),
            },
            "compute" => match project.refresh() {
                Ok(summary) => {
                    println!("Scheduled ({})", summary.to_cli_summary());
                    for task in &summary.defaulted_tasks {
                        println!("Warning: '{task}' is not in the catalog; used default duration.");
                    }
                    if summary.finishes_on > project.metadata().deadline {
                        println!(
                            "Warning: finish {} exceeds the deadline {}.",
                            summary.finishes_on,
                            project.metadata().deadline
                        );
                    }
                    print_schedule(&project);
                }
                Err(e) => println!("Scheduling error: {e}"),
            },
            "show" => print_schedule(&project),
            "report" => {
                let dir = parts.next().unwrap_or(".");
                match project.calendar() {
                    Some(calendar) => {
                        match write_report(calendar, project.metadata(), Path::new(dir)) {
                            Ok(path) => println!("Report written to {}", path.display()),
                            Err(e) => println!("Error writing report: {e}"),
                        }
                    }
                    None => println!("No schedule computed yet. Use 'compute'."),
                }
            }
            "save" => {
                let format = parts.next();
                let path = parts.next();
                match (format, path) {
                    (Some("json"), Some(path)) => match save_project_to_json(&project, path) {
                        Ok(()) => println!("Project saved to {path}."),
                        Err(e) => println!("Error: {e}"),
                    },
                    (Some("csv"), Some(path)) => match project.calendar() {
                        Some(calendar) => match save_calendar_to_csv(calendar, path) {
                            Ok(()) => println!("Calendar saved to {path}."),
                            Err(e) => println!("Error: {e}"),
                        },
                        None => println!("No schedule computed yet. Use 'compute'."),
                    },
                    _ => println!("Usage: save <json|csv> <path>"),
                }
            }
            "load" => match parts.next() {
                Some(path) => match load_project_from_json(path, catalog.clone()) {
                    Ok(loaded) => {
                        project = loaded;
                        println!("Project loaded.");
                        print_metadata(&project);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: load <json_path>"),
            },
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
    }
}
