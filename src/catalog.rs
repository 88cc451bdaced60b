use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::graph::SelectionGraph;

/// A catalog task: identifier plus base duration in days per 4 m² of floor
/// area. Definitions are immutable once the catalog is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDefinition {
    pub id: String,
    pub base_duration: f64,
}

impl TaskDefinition {
    pub fn new(id: impl Into<String>, base_duration: f64) -> Self {
        Self {
            id: id.into(),
            base_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewSpecialty {
    pub name: String,
    pub headcount: u32,
}

impl CrewSpecialty {
    pub fn new(name: impl Into<String>, headcount: u32) -> Self {
        Self {
            name: name.into(),
            headcount,
        }
    }
}

/// Crew capacities per specialty. Declared reference data: the scheduler
/// places tasks strictly sequentially and never consults these counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRoster {
    pub specialties: Vec<CrewSpecialty>,
    pub multiskilled_masons: u32,
}

impl Default for CrewRoster {
    fn default() -> Self {
        Self {
            specialties: Vec::new(),
            multiskilled_masons: 0,
        }
    }
}

#[derive(Debug)]
pub enum CatalogError {
    DuplicateTask(String),
    InvalidBaseDuration { task: String, value: f64 },
    UnknownDependency { task: String, dependency: String },
    CyclicDependencies(Vec<String>),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateTask(id) => write!(f, "duplicate task id '{id}'"),
            CatalogError::InvalidBaseDuration { task, value } => {
                write!(f, "task '{task}' has non-positive base duration {value}")
            }
            CatalogError::UnknownDependency { task, dependency } => {
                write!(f, "task '{task}' depends on unknown task '{dependency}'")
            }
            CatalogError::CyclicDependencies(tasks) => {
                write!(f, "dependency cycle among tasks: {}", tasks.join(", "))
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The task catalog: declaration-ordered task definitions, a map from task
/// to its prerequisite tasks, and the crew roster. Built once at startup
/// and shared read-only; scheduling requests never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCatalog {
    tasks: Vec<TaskDefinition>,
    dependencies: HashMap<String, Vec<String>>,
    crews: CrewRoster,
}

impl TaskCatalog {
    pub fn new(
        tasks: Vec<TaskDefinition>,
        dependencies: HashMap<String, Vec<String>>,
        crews: CrewRoster,
    ) -> Self {
        Self {
            tasks,
            dependencies,
            crews,
        }
    }

    /// The built-in renovation catalog: task base durations, precedence
    /// constraints, and crew capacities for a bathroom/kitchen renovation.
    pub fn standard() -> Self {
        let tasks = vec![
            TaskDefinition::new("remocao_armarios_loicas", 0.5),
            TaskDefinition::new("demolicoes_rocos", 1.0),
            TaskDefinition::new("demolicao_paredes", 2.0),
            TaskDefinition::new("canalizacoes", 0.5),
            TaskDefinition::new("eletricidades", 0.5),
            TaskDefinition::new("assentamento_base_duche", 0.5),
            TaskDefinition::new("assentamento_sanitarios", 0.5),
            TaskDefinition::new("estuque", 2.0),
            TaskDefinition::new("pintura", 1.0),
            TaskDefinition::new("montagem_moveis", 2.0),
            TaskDefinition::new("barramento_paredes", 1.0),
            TaskDefinition::new("regularizacao_pavimento", 1.0),
            TaskDefinition::new("preparacao_paredes", 1.0),
            TaskDefinition::new("teto_falso_montagem", 1.0),
            TaskDefinition::new("acabamento_pintura_teto_falso", 1.0),
            TaskDefinition::new("divisoria_gesso_laminado", 1.0),
            TaskDefinition::new("pre_instalacao_ac", 1.0),
            TaskDefinition::new("assentamento_soalho", 0.5),
            TaskDefinition::new("assentamento_ladrilho", 1.0),
            TaskDefinition::new("assentamento_azulejo", 1.0),
            TaskDefinition::new("caixilharias", 1.0),
        ];

        let mut dependencies: HashMap<String, Vec<String>> = HashMap::new();
        let mut dep = |task: &str, prereqs: &[&str]| {
            dependencies.insert(
                task.to_string(),
                prereqs.iter().map(|p| p.to_string()).collect(),
            );
        };
        dep("demolicoes_rocos", &["remocao_armarios_loicas"]);
        dep("demolicao_paredes", &["remocao_armarios_loicas"]);
        dep("canalizacoes", &["demolicoes_rocos"]);
        dep("eletricidades", &["demolicoes_rocos"]);
        dep("assentamento_base_duche", &["canalizacoes"]);
        dep("estuque", &["canalizacoes", "eletricidades"]);
        dep("pintura", &["estuque", "preparacao_paredes"]);
        dep("montagem_moveis", &["pintura"]);
        dep("assentamento_sanitarios", &["pintura"]);
        dep("teto_falso_montagem", &["demolicoes_rocos"]);
        dep("acabamento_pintura_teto_falso", &["teto_falso_montagem"]);
        dep("divisoria_gesso_laminado", &["demolicoes_rocos"]);
        dep("pre_instalacao_ac", &["demolicoes_rocos"]);
        dep("assentamento_soalho", &["regularizacao_pavimento"]);
        dep("assentamento_ladrilho", &["regularizacao_pavimento"]);
        dep("assentamento_azulejo", &["regularizacao_pavimento"]);

        let crews = CrewRoster {
            specialties: vec![
                CrewSpecialty::new("pedreiro", 5),
                CrewSpecialty::new("servente", 10),
                CrewSpecialty::new("electricista", 1),
                CrewSpecialty::new("canalizador", 1),
                CrewSpecialty::new("pintor", 2),
                CrewSpecialty::new("gesso_laminado", 2),
            ],
            multiskilled_masons: 3,
        };

        Self::new(tasks, dependencies, crews)
    }

    /// Task definitions in declaration order. This order drives the
    /// scheduler's iteration and therefore the calendar's entry order.
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn base_duration(&self, id: &str) -> Option<f64> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.base_duration)
    }

    /// Prerequisites of a task. A task absent from the dependency map has
    /// none.
    pub fn prerequisites(&self, id: &str) -> &[String] {
        self.dependencies.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependencies(&self) -> &HashMap<String, Vec<String>> {
        &self.dependencies
    }

    pub fn crews(&self) -> &CrewRoster {
        &self.crews
    }

    /// Structural validation: duplicate ids, non-positive base durations,
    /// dependency edges pointing outside the catalog, and cycles over the
    /// full catalog. The scheduler itself only detects cycles dynamically
    /// within a selection; this is the stricter load-time check for custom
    /// catalogs.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::with_capacity(self.tasks.len());
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(CatalogError::DuplicateTask(task.id.clone()));
            }
            if !(task.base_duration > 0.0) {
                return Err(CatalogError::InvalidBaseDuration {
                    task: task.id.clone(),
                    value: task.base_duration,
                });
            }
        }

        for (task, prereqs) in &self.dependencies {
            for prereq in prereqs {
                if !seen.contains(prereq.as_str()) {
                    return Err(CatalogError::UnknownDependency {
                        task: task.clone(),
                        dependency: prereq.clone(),
                    });
                }
            }
        }

        let all_ids: Vec<String> = self.tasks.iter().map(|t| t.id.clone()).collect();
        let graph = SelectionGraph::build(self, &all_ids);
        let cycle = graph.cycle_members();
        if !cycle.is_empty() {
            return Err(CatalogError::CyclicDependencies(cycle));
        }

        Ok(())
    }
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_structurally_valid() {
        let catalog = TaskCatalog::standard();
        assert_eq!(catalog.len(), 21);
        catalog.validate().unwrap();
    }

    #[test]
    fn prerequisites_default_to_empty() {
        let catalog = TaskCatalog::standard();
        assert!(catalog.prerequisites("remocao_armarios_loicas").is_empty());
        assert_eq!(
            catalog.prerequisites("canalizacoes"),
            ["demolicoes_rocos".to_string()]
        );
    }
}
