//! Dependency declarations, configurations, and project nodes.
//!
//! A [`Project`] owns an ordered list of named [`Configuration`]s. Each
//! configuration is an ordered set of [`Dependency`] edges plus the
//! [`ExclusionRule`]s that apply to every edge it holds.

use std::fmt;

use kiln_common::{Coordinate, Ident};
use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

/// A `(group, module)` filter that suppresses matching artifact dependencies.
///
/// A rule without a module matches every artifact in its group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExclusionRule {
    /// The artifact group to match.
    pub group: String,
    /// The artifact name to match, or `None` for any artifact in the group.
    pub module: Option<String>,
}

impl ExclusionRule {
    /// Creates a rule matching every artifact in `group`.
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: None,
        }
    }

    /// Creates a rule matching exactly `group:module`.
    pub fn module(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: Some(module.into()),
        }
    }

    /// Returns `true` if the rule covers the artifact at `coordinate`.
    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        if self.group != coordinate.group {
            return false;
        }
        match self.module.as_deref() {
            None | Some("") => true,
            Some(module) => module == coordinate.name,
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.module.as_deref() {
            None | Some("") => write!(f, "{}", self.group),
            Some(module) => write!(f, "{}:{module}", self.group),
        }
    }
}

/// A dependency on a prebuilt binary artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDependency {
    /// The artifact's group/name/version.
    pub coordinate: Coordinate,
    /// Exclusions that apply only to this edge.
    pub excludes: Vec<ExclusionRule>,
}

impl ArtifactDependency {
    /// Creates an artifact dependency without per-edge exclusions.
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            excludes: Vec::new(),
        }
    }

    /// Adds a per-edge exclusion rule, returning `self` for chaining.
    pub fn with_exclude(mut self, rule: ExclusionRule) -> Self {
        self.excludes.push(rule);
        self
    }
}

/// A single dependency edge declared in a configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dependency {
    /// A source reference to another project in the graph.
    Project(ProjectId),
    /// A reference to a prebuilt binary artifact.
    Artifact(ArtifactDependency),
}

impl Dependency {
    /// Shorthand for an artifact dependency without per-edge exclusions.
    pub fn artifact(coordinate: Coordinate) -> Self {
        Self::Artifact(ArtifactDependency::new(coordinate))
    }

    /// Returns the referenced project if this is a source reference.
    pub fn as_project(&self) -> Option<ProjectId> {
        match self {
            Self::Project(id) => Some(*id),
            Self::Artifact(_) => None,
        }
    }

    /// Returns the artifact details if this is an artifact reference.
    pub fn as_artifact(&self) -> Option<&ArtifactDependency> {
        match self {
            Self::Project(_) => None,
            Self::Artifact(artifact) => Some(artifact),
        }
    }
}

/// A named, ordered set of dependency edges with its own exclusion rules.
///
/// Names such as `api`, `debugImplementation` or `tiyaReleaseRuntimeOnly` are
/// shared across projects; two configurations with the same name in
/// different projects are considered matching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    name: String,
    dependencies: Vec<Dependency>,
    excludes: Vec<ExclusionRule>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            excludes: Vec::new(),
        }
    }

    /// The configuration's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared dependencies in insertion order.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// The configuration-wide exclusion rules in declaration order.
    pub fn excludes(&self) -> &[ExclusionRule] {
        &self.excludes
    }

    /// Returns `true` if an equal dependency is already declared.
    pub fn contains(&self, dependency: &Dependency) -> bool {
        self.dependencies.contains(dependency)
    }

    /// Adds a dependency. Returns `false` if an equal one was already present.
    pub fn add(&mut self, dependency: Dependency) -> bool {
        if self.contains(&dependency) {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    /// Puts `new` where `old` was declared.
    ///
    /// If `new` is already present elsewhere, `old` is just removed. Returns
    /// `false` if `old` was not declared.
    pub fn replace(&mut self, old: &Dependency, new: Dependency) -> bool {
        let Some(index) = self.dependencies.iter().position(|d| d == old) else {
            return false;
        };
        if self.contains(&new) {
            self.dependencies.remove(index);
        } else {
            self.dependencies[index] = new;
        }
        true
    }

    /// Appends a configuration-wide exclusion rule.
    pub fn add_exclude(&mut self, rule: ExclusionRule) {
        self.excludes.push(rule);
    }
}

/// A node in the build graph.
#[derive(Clone, Debug)]
pub struct Project {
    path: Ident,
    configurations: Vec<Configuration>,
}

impl Project {
    /// Creates a project with no configurations.
    pub fn new(path: Ident) -> Self {
        Self {
            path,
            configurations: Vec::new(),
        }
    }

    /// The interned project path.
    pub fn path(&self) -> Ident {
        self.path
    }

    /// All configurations in declaration order.
    pub fn configurations(&self) -> &[Configuration] {
        &self.configurations
    }

    /// Mutable access to the configurations. The set of names is fixed.
    pub fn configurations_mut(&mut self) -> &mut [Configuration] {
        &mut self.configurations
    }

    /// Looks up a configuration by name.
    pub fn configuration(&self, name: &str) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.name == name)
    }

    /// Looks up a configuration by name for mutation.
    pub fn configuration_mut(&mut self, name: &str) -> Option<&mut Configuration> {
        self.configurations.iter_mut().find(|c| c.name == name)
    }

    /// Returns the configuration called `name`, declaring it if needed.
    pub fn configuration_or_insert(&mut self, name: &str) -> &mut Configuration {
        let index = match self.configurations.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.configurations.push(Configuration::new(name));
                self.configurations.len() - 1
            }
        };
        &mut self.configurations[index]
    }
}
