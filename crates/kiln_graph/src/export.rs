//! Export of the module dependency graph recorded during a pass.
//!
//! Nodes are registered modules, edges are the `dependency_modules` entries
//! observed by the traversal. Repeated observations of the same edge are
//! collapsed into one edge whose weight counts them.

use std::collections::{BTreeMap, HashMap};

use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::ProjectGraph;
use crate::ids::ModuleId;
use crate::registry::ModuleRegistry;

/// Builds a directed graph of module paths from the registry.
///
/// Every registered module becomes a node, whether or not it was reached.
pub fn module_graph(registry: &ModuleRegistry, graph: &ProjectGraph) -> DiGraph<String, usize> {
    let mut out = DiGraph::new();
    let mut nodes: HashMap<ModuleId, NodeIndex> = HashMap::new();
    for (id, record) in registry.modules() {
        let path = graph.interner().resolve(record.path).to_string();
        nodes.insert(id, out.add_node(path));
    }
    for (id, record) in registry.modules() {
        let from = nodes[&id];
        for dependency in &record.dependency_modules {
            let to = nodes[dependency];
            match out.find_edge(from, to) {
                Some(edge) => out[edge] += 1,
                None => {
                    out.add_edge(from, to, 1);
                }
            }
        }
    }
    out
}

/// Renders a module graph in Graphviz DOT format.
pub fn to_dot(modules: &DiGraph<String, usize>) -> String {
    format!("{}", Dot::new(modules))
}

/// Flattens a module graph into a sorted path → dependency-paths map.
pub fn to_adjacency(modules: &DiGraph<String, usize>) -> BTreeMap<String, Vec<String>> {
    let mut adjacency = BTreeMap::new();
    for node in modules.node_indices() {
        let mut targets: Vec<String> = modules
            .neighbors(node)
            .map(|n| modules[n].clone())
            .collect();
        targets.sort();
        adjacency.insert(modules[node].clone(), targets);
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ModuleSpec;

    fn registry_with_edges() -> (ProjectGraph, ModuleRegistry) {
        let mut graph = ProjectGraph::new();
        for path in [":a", ":b", ":c"] {
            graph.add_project(path).unwrap();
        }
        let mut registry = ModuleRegistry::new();
        let a = registry
            .register(&graph, ModuleSpec::new(":a", "g:a:1".parse().unwrap()))
            .unwrap();
        let b = registry
            .register(&graph, ModuleSpec::new(":b", "g:b:1".parse().unwrap()))
            .unwrap();
        let c = registry
            .register(&graph, ModuleSpec::new(":c", "g:c:1".parse().unwrap()))
            .unwrap();
        registry.get_mut(a).dependency_modules = vec![c, b, c];
        (graph, registry)
    }

    #[test]
    fn duplicate_observations_collapse() {
        let (graph, registry) = registry_with_edges();
        let modules = module_graph(&registry, &graph);
        assert_eq!(modules.node_count(), 3);
        assert_eq!(modules.edge_count(), 2);
        let weights: Vec<usize> = modules.edge_weights().copied().collect();
        assert!(weights.contains(&2));
    }

    #[test]
    fn adjacency_is_sorted() {
        let (graph, registry) = registry_with_edges();
        let adjacency = to_adjacency(&module_graph(&registry, &graph));
        assert_eq!(adjacency[":a"], vec![":b", ":c"]);
        assert!(adjacency[":b"].is_empty());
        assert!(adjacency[":c"].is_empty());
    }

    #[test]
    fn dot_mentions_every_module() {
        let (graph, registry) = registry_with_edges();
        let dot = to_dot(&module_graph(&registry, &graph));
        assert!(dot.starts_with("digraph"));
        for path in [":a", ":b", ":c"] {
            assert!(dot.contains(path), "missing {path} in {dot}");
        }
    }
}
