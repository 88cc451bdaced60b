use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

use crate::catalog::TaskCatalog;

/// Dependency graph restricted to one project's selected tasks.
///
/// Nodes are the selected task identifiers; an edge `p -> t` exists when
/// `p` is a catalog prerequisite of `t` and both are selected. Prerequisites
/// outside the selection are treated as already satisfied, so they produce
/// no node and no edge.
pub struct SelectionGraph {
    graph: DiGraph<String, ()>,
    id_to_index: HashMap<String, NodeIndex>,
}

impl SelectionGraph {
    pub fn build(catalog: &TaskCatalog, selected: &[String]) -> Self {
        let selected_set: HashSet<&str> = selected.iter().map(String::as_str).collect();

        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();

        // Nodes first, in selection order, deduplicated.
        for task in selected {
            if !id_to_index.contains_key(task.as_str()) {
                let node = graph.add_node(task.clone());
                id_to_index.insert(task.clone(), node);
            }
        }

        // Edges: prerequisite -> task, both within the selection. Node
        // insertion order keeps traversal deterministic.
        for to in graph.node_indices().collect::<Vec<_>>() {
            let task = graph[to].clone();
            for prereq in catalog.prerequisites(&task) {
                if !selected_set.contains(prereq.as_str()) {
                    continue;
                }
                if let Some(&from) = id_to_index.get(prereq.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        Self { graph, id_to_index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, task: &str) -> bool {
        self.id_to_index.contains_key(task)
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// One valid execution order, or `None` when the selection has a cycle.
    pub fn topological_order(&self) -> Option<Vec<String>> {
        toposort(&self.graph, None)
            .ok()
            .map(|order| order.into_iter().map(|n| self.graph[n].clone()).collect())
    }

    /// Tasks that sit on a dependency cycle: members of strongly connected
    /// components with more than one node, plus self-loops. Empty for an
    /// acyclic selection.
    pub fn cycle_members(&self) -> Vec<String> {
        let mut members = Vec::new();
        for component in tarjan_scc(&self.graph) {
            let is_cycle = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| self.graph.find_edge(n, n).is_some());
            if is_cycle {
                for node in component {
                    members.push(self.graph[node].clone());
                }
            }
        }
        members.sort();
        members
    }
}
