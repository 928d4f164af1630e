//! The depth-first rewrite pass.
//!
//! Starting at a root project, the pass visits every project reachable
//! through source references. For each edge into an enabled module it either
//! swaps the source reference for the module's artifact (cache hit) or emits
//! a [`BuildRequest`] (cache miss). When a cache-hit module's subtree has been
//! rewritten, its dependencies are propagated into the parent under every
//! variant prefix the module builds.

use std::collections::HashSet;

use kiln_common::Coordinate;
use serde::Serialize;

use crate::error::RewriteError;
use crate::exclusion::ExclusionPolicy;
use crate::graph::ProjectGraph;
use crate::ids::{ModuleId, ProjectId};
use crate::model::Dependency;
use crate::propagate::propagate;
use crate::registry::ModuleRegistry;
use crate::schedule::BuildRequest;
use crate::variant::variant_prefixes;

/// Knobs for a rewrite pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    /// How configuration exclusion rules are evaluated during propagation.
    pub exclusion_policy: ExclusionPolicy,
}

/// A source reference that was replaced by an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    /// The project whose configuration was rewritten.
    pub project: ProjectId,
    /// The rewritten configuration.
    pub configuration: String,
    /// The module that was substituted.
    pub module: ModuleId,
    /// The artifact now declared in place of the source reference.
    pub artifact: Coordinate,
}

/// Everything a pass observed, besides the in-place graph edits.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RewriteOutcome {
    /// Source references replaced by artifacts, in visit order.
    pub substitutions: Vec<Substitution>,
    /// One request per cache-miss edge, in visit order. Not de-duplicated.
    pub build_requests: Vec<BuildRequest>,
    /// Dependencies added to parents by propagation.
    pub propagated: usize,
    /// Project visits, counting every path that reaches a project.
    pub visited: usize,
}

/// Rewrites the graph below `root` in place.
///
/// Fails only if `root` is not in the graph or a true dependency cycle is
/// reachable from it; a project that depends on itself directly is left
/// alone. Both checks run before anything is modified, so on error the graph
/// and registry are untouched.
pub fn rewrite(
    graph: &mut ProjectGraph,
    registry: &mut ModuleRegistry,
    root: ProjectId,
    options: &RewriteOptions,
) -> Result<RewriteOutcome, RewriteError> {
    if !graph.contains(root) {
        return Err(RewriteError::InvalidRoot(root));
    }
    if let Some(cycle) = find_cycle(graph, root) {
        return Err(RewriteError::Cycle { cycle });
    }
    let mut ctx = RewriteContext {
        graph,
        registry,
        policy: options.exclusion_policy,
        outcome: RewriteOutcome::default(),
    };
    ctx.visit(root, None);

    let outcome = ctx.outcome;
    tracing::info!(
        visited = outcome.visited,
        substituted = outcome.substitutions.len(),
        build_requests = outcome.build_requests.len(),
        propagated = outcome.propagated,
        "rewrite pass finished"
    );
    Ok(outcome)
}

/// Resolves `root` by path, then runs [`rewrite`].
pub fn rewrite_path(
    graph: &mut ProjectGraph,
    registry: &mut ModuleRegistry,
    root: &str,
    options: &RewriteOptions,
) -> Result<RewriteOutcome, RewriteError> {
    let root_id = graph
        .find(root)
        .ok_or_else(|| RewriteError::UnknownProject(root.to_string()))?;
    rewrite(graph, registry, root_id, options)
}

/// Returns the first cycle of source references reachable from `root`, as
/// project paths with the first and last entries equal.
///
/// Self references are ignored. Propagation only adds shortcuts to projects
/// that are already reachable, so an acyclic graph stays acyclic for the
/// whole pass.
fn find_cycle(graph: &ProjectGraph, root: ProjectId) -> Option<Vec<String>> {
    fn walk(
        graph: &ProjectGraph,
        project: ProjectId,
        stack: &mut Vec<ProjectId>,
        done: &mut HashSet<ProjectId>,
    ) -> Option<Vec<String>> {
        if let Some(start) = stack.iter().position(|&p| p == project) {
            let mut cycle: Vec<String> = stack[start..]
                .iter()
                .map(|&p| graph.path(p).to_string())
                .collect();
            cycle.push(graph.path(project).to_string());
            return Some(cycle);
        }
        if done.contains(&project) {
            return None;
        }
        stack.push(project);
        for conf in graph.project(project).configurations() {
            for child in conf.dependencies().iter().filter_map(Dependency::as_project) {
                if child == project {
                    continue;
                }
                if let Some(cycle) = walk(graph, child, stack, done) {
                    return Some(cycle);
                }
            }
        }
        stack.pop();
        done.insert(project);
        None
    }

    walk(graph, root, &mut Vec::new(), &mut HashSet::new())
}

/// Mutable state carried through the recursive walk.
struct RewriteContext<'a> {
    graph: &'a mut ProjectGraph,
    registry: &'a mut ModuleRegistry,
    policy: ExclusionPolicy,
    outcome: RewriteOutcome,
}

impl RewriteContext<'_> {
    fn visit(&mut self, project: ProjectId, parent: Option<ProjectId>) {
        self.outcome.visited += 1;
        tracing::debug!(project = self.graph.path(project), "visiting");

        let module = self.registry.lookup_by_project(self.graph, project);

        let configuration_count = self.graph.project(project).configurations().len();
        for index in 0..configuration_count {
            // Edges added while children are rewritten are not revisited.
            let snapshot: Vec<ProjectId> = self.graph.project(project).configurations()[index]
                .dependencies()
                .iter()
                .filter_map(Dependency::as_project)
                .collect();
            for dependency in snapshot {
                self.handle_edge(project, module, index, dependency);
            }
        }

        if let (Some(parent), Some(module)) = (parent, module) {
            let record = self.registry.get(module);
            if record.cache_valid {
                for prefix in variant_prefixes(&record.flavor) {
                    self.outcome.propagated +=
                        propagate(self.graph, project, parent, &prefix, self.policy);
                }
            }
        }
    }

    fn handle_edge(
        &mut self,
        current: ProjectId,
        current_module: Option<ModuleId>,
        configuration: usize,
        dependency: ProjectId,
    ) {
        if dependency == current {
            tracing::trace!(project = self.graph.path(current), "skipping self reference");
            return;
        }

        let dependency_module = self.registry.lookup_by_project(self.graph, dependency);
        if let Some(module) = dependency_module {
            let record = self.registry.get_mut(module);
            if record.enabled {
                record.referenced = true;
                if record.cache_valid {
                    let conf =
                        &mut self.graph.project_mut(current).configurations_mut()[configuration];
                    let artifact = record.artifact_dependency();
                    conf.replace(&Dependency::Project(dependency), Dependency::Artifact(artifact));
                    self.outcome.substitutions.push(Substitution {
                        project: current,
                        configuration: conf.name().to_string(),
                        module,
                        artifact: record.artifact.clone(),
                    });
                    tracing::debug!(
                        configuration = conf.name(),
                        artifact = %record.artifact,
                        "substituted artifact"
                    );
                } else {
                    let path = self.graph.interner().resolve(record.path).to_string();
                    tracing::debug!(module = %path, "cache miss, requesting build");
                    self.outcome.build_requests.push(BuildRequest {
                        module,
                        path,
                        artifact: record.artifact.clone(),
                    });
                }
            }
        }

        if let (Some(current_module), Some(dependency_module)) = (current_module, dependency_module)
        {
            self.registry
                .get_mut(current_module)
                .dependency_modules
                .push(dependency_module);
        }

        self.visit(dependency, Some(current));
    }
}
