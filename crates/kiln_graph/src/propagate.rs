//! Re-threading a substituted module's dependencies into its parent.
//!
//! Once a module is consumed as a binary artifact, the build no longer sees
//! the dependencies it was compiled against. [`propagate`] copies them one
//! level up, into the parent's configuration of the same name.

use crate::exclusion::{is_excluded, ExclusionPolicy};
use crate::graph::ProjectGraph;
use crate::ids::ProjectId;
use crate::model::Dependency;
use crate::variant::{configuration_name, PROPAGATED_CONFIGURATIONS};

/// Copies the `api`, `runtimeOnly` and `implementation` dependencies of
/// `source` under variant `prefix` into the same-named configurations of
/// `destination`.
///
/// A configuration missing on either side is skipped. Artifact dependencies
/// excluded by the source or destination configuration are dropped; the
/// rest carry both configurations' exclusion rules with them. A source
/// reference from `source` to itself is not copied, since the parent already
/// holds `source`'s artifact in its place. Returns the number of
/// dependencies added to `destination`.
pub fn propagate(
    graph: &mut ProjectGraph,
    source: ProjectId,
    destination: ProjectId,
    prefix: &str,
    policy: ExclusionPolicy,
) -> usize {
    let mut added = 0;
    for base in PROPAGATED_CONFIGURATIONS {
        let name = configuration_name(prefix, base);
        let copies = match collect_copies(graph, source, destination, &name, policy) {
            Some(copies) => copies,
            None => continue,
        };
        let Some(target) = graph.project_mut(destination).configuration_mut(&name) else {
            continue;
        };
        for dependency in copies {
            if target.add(dependency) {
                added += 1;
            }
        }
    }
    if added > 0 {
        tracing::trace!(
            source = graph.path(source),
            destination = graph.path(destination),
            prefix,
            added,
            "propagated dependencies"
        );
    }
    added
}

/// Builds the list of dependencies to copy for one configuration name, or
/// `None` if either project lacks that configuration.
fn collect_copies(
    graph: &ProjectGraph,
    source: ProjectId,
    destination: ProjectId,
    name: &str,
    policy: ExclusionPolicy,
) -> Option<Vec<Dependency>> {
    let to = graph.project(destination).configuration(name)?;
    let from = graph.project(source).configuration(name)?;

    let mut copies = Vec::with_capacity(from.dependencies().len());
    for dependency in from.dependencies() {
        let artifact = match dependency {
            Dependency::Project(id) if *id == source => continue,
            Dependency::Project(_) => {
                copies.push(dependency.clone());
                continue;
            }
            Dependency::Artifact(artifact) => artifact,
        };
        if is_excluded(from, dependency, policy) || is_excluded(to, dependency, policy) {
            tracing::trace!(
                artifact = %artifact.coordinate,
                configuration = name,
                "excluded from propagation"
            );
            continue;
        }
        let mut copy = artifact.clone();
        copy.excludes.extend(from.excludes().iter().cloned());
        copy.excludes.extend(to.excludes().iter().cloned());
        copies.push(Dependency::Artifact(copy));
    }
    Some(copies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArtifactDependency, ExclusionRule};

    fn dep(s: &str) -> Dependency {
        Dependency::artifact(s.parse().unwrap())
    }

    fn two_projects() -> (ProjectGraph, ProjectId, ProjectId) {
        let mut graph = ProjectGraph::new();
        let parent = graph.add_project(":app").unwrap();
        let child = graph.add_project(":lib").unwrap();
        (graph, parent, child)
    }

    #[test]
    fn copies_into_matching_configuration() {
        let (mut graph, parent, child) = two_projects();
        graph
            .project_mut(child)
            .configuration_or_insert("implementation")
            .add(dep("g:x:2.0"));
        graph.project_mut(parent).configuration_or_insert("implementation");

        let added = propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules);
        assert_eq!(added, 1);
        let conf = graph.project(parent).configuration("implementation").unwrap();
        assert!(conf.contains(&dep("g:x:2.0")));
    }

    #[test]
    fn missing_destination_variant_is_noop() {
        let (mut graph, parent, child) = two_projects();
        graph
            .project_mut(child)
            .configuration_or_insert("debugApi")
            .add(dep("g:x:2.0"));
        graph
            .project_mut(parent)
            .configuration_or_insert("api")
            .add(dep("g:keep:1"));

        let added = propagate(&mut graph, child, parent, "debug", ExclusionPolicy::AllRules);
        assert_eq!(added, 0);
        let parent_node = graph.project(parent);
        assert_eq!(parent_node.configurations().len(), 1);
        assert_eq!(
            parent_node.configuration("api").unwrap().dependencies(),
            &[dep("g:keep:1")]
        );
    }

    #[test]
    fn missing_source_variant_is_noop() {
        let (mut graph, parent, child) = two_projects();
        graph.project_mut(parent).configuration_or_insert("api");
        assert_eq!(
            propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules),
            0
        );
    }

    #[test]
    fn prefix_selects_variant_configuration() {
        let (mut graph, parent, child) = two_projects();
        graph
            .project_mut(child)
            .configuration_or_insert("flavorImplementation")
            .add(dep("g:f:1"));
        graph
            .project_mut(child)
            .configuration_or_insert("implementation")
            .add(dep("g:plain:1"));
        graph.project_mut(parent).configuration_or_insert("flavorImplementation");
        graph.project_mut(parent).configuration_or_insert("implementation");

        propagate(&mut graph, child, parent, "flavor", ExclusionPolicy::AllRules);
        let parent_node = graph.project(parent);
        assert_eq!(
            parent_node
                .configuration("flavorImplementation")
                .unwrap()
                .dependencies(),
            &[dep("g:f:1")]
        );
        assert!(parent_node
            .configuration("implementation")
            .unwrap()
            .dependencies()
            .is_empty());
    }

    #[test]
    fn excluded_by_source_is_not_copied() {
        let (mut graph, parent, child) = two_projects();
        let conf = graph.project_mut(child).configuration_or_insert("api");
        conf.add(dep("org.junk:a:1"));
        conf.add(dep("org.good:b:1"));
        conf.add_exclude(ExclusionRule::group("org.junk"));
        graph.project_mut(parent).configuration_or_insert("api");

        let added = propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules);
        assert_eq!(added, 1);
        let copied = graph.project(parent).configuration("api").unwrap().dependencies();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied[0].as_artifact().unwrap().coordinate.group, "org.good");
    }

    #[test]
    fn excluded_by_destination_is_not_copied() {
        let (mut graph, parent, child) = two_projects();
        graph
            .project_mut(child)
            .configuration_or_insert("runtimeOnly")
            .add(dep("org.junk:a:1"));
        graph
            .project_mut(parent)
            .configuration_or_insert("runtimeOnly")
            .add_exclude(ExclusionRule::module("org.junk", "a"));

        assert_eq!(
            propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules),
            0
        );
    }

    #[test]
    fn copied_dependency_carries_both_sides_exclusions() {
        let (mut graph, parent, child) = two_projects();
        let existing = ArtifactDependency::new("g:x:1".parse().unwrap())
            .with_exclude(ExclusionRule::group("own"));
        let conf = graph.project_mut(child).configuration_or_insert("api");
        conf.add(Dependency::Artifact(existing));
        conf.add_exclude(ExclusionRule::group("src.one"));
        conf.add_exclude(ExclusionRule::module("src.two", "m"));
        graph
            .project_mut(parent)
            .configuration_or_insert("api")
            .add_exclude(ExclusionRule::group("dst.one"));

        propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules);
        let copied = &graph.project(parent).configuration("api").unwrap().dependencies()[0];
        let excludes = &copied.as_artifact().unwrap().excludes;
        assert_eq!(
            excludes,
            &vec![
                ExclusionRule::group("own"),
                ExclusionRule::group("src.one"),
                ExclusionRule::module("src.two", "m"),
                ExclusionRule::group("dst.one"),
            ]
        );
        // The source keeps its own edge untouched.
        let original = &graph.project(child).configuration("api").unwrap().dependencies()[0];
        assert_eq!(original.as_artifact().unwrap().excludes.len(), 1);
    }

    #[test]
    fn source_reference_copied_verbatim() {
        let (mut graph, parent, child) = two_projects();
        let other = graph.add_project(":other").unwrap();
        let conf = graph.project_mut(child).configuration_or_insert("api");
        conf.add(Dependency::Project(other));
        conf.add_exclude(ExclusionRule::group("g"));
        graph.project_mut(parent).configuration_or_insert("api");

        propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules);
        assert_eq!(
            graph.project(parent).configuration("api").unwrap().dependencies(),
            &[Dependency::Project(other)]
        );
    }

    #[test]
    fn self_reference_is_not_copied() {
        let (mut graph, parent, child) = two_projects();
        let conf = graph.project_mut(child).configuration_or_insert("implementation");
        conf.add(Dependency::Project(child));
        conf.add(dep("g:x:1"));
        graph.project_mut(parent).configuration_or_insert("implementation");

        let added = propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules);
        assert_eq!(added, 1);
        assert_eq!(
            graph
                .project(parent)
                .configuration("implementation")
                .unwrap()
                .dependencies(),
            &[dep("g:x:1")]
        );
    }

    #[test]
    fn repeated_propagation_does_not_duplicate() {
        let (mut graph, parent, child) = two_projects();
        graph
            .project_mut(child)
            .configuration_or_insert("api")
            .add(dep("g:x:1"));
        graph.project_mut(parent).configuration_or_insert("api");

        assert_eq!(propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules), 1);
        assert_eq!(propagate(&mut graph, child, parent, "", ExclusionPolicy::AllRules), 0);
        assert_eq!(
            graph.project(parent).configuration("api").unwrap().dependencies().len(),
            1
        );
    }
}
