//! Registry of modules eligible for artifact substitution.
//!
//! The [`ModuleRegistry`] maps a project path to its [`ModuleRecord`]. Most
//! projects reachable during a pass have no record (the application root
//! usually doesn't), so every lookup returns an `Option`.

use std::collections::HashMap;

use kiln_common::{Coordinate, Ident};
use serde::Serialize;

use crate::arena::Arena;
use crate::error::GraphError;
use crate::graph::ProjectGraph;
use crate::ids::{ModuleId, ProjectId};
use crate::model::ArtifactDependency;

/// Metadata for a project that takes part in artifact substitution.
///
/// `enabled`, `cache_valid`, `flavor` and `artifact` are fixed before a pass
/// starts. `referenced` and `dependency_modules` are filled in by the pass.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRecord {
    /// The interned path of the wrapped project.
    pub path: Ident,
    /// The wrapped project node.
    pub project: ProjectId,
    /// Whether the module may be substituted at all.
    pub enabled: bool,
    /// Whether the module's cached artifact is up to date.
    pub cache_valid: bool,
    /// Build-variant (flavor) name, empty when the module has none.
    pub flavor: String,
    /// Set once another project has been seen depending on this module.
    pub referenced: bool,
    /// Coordinates substituted in on a cache hit.
    pub artifact: Coordinate,
    /// Modules this one was observed to depend on, in visit order.
    /// Duplicates are kept.
    pub dependency_modules: Vec<ModuleId>,
}

impl ModuleRecord {
    /// Builds the artifact dependency that replaces a source reference to
    /// this module.
    pub fn artifact_dependency(&self) -> ArtifactDependency {
        ArtifactDependency::new(self.artifact.clone())
    }
}

/// Registration input for one module.
#[derive(Debug, Clone)]
pub struct ModuleSpec {
    /// Path of the project the module wraps.
    pub path: String,
    /// Coordinates of the module's prebuilt artifact.
    pub artifact: Coordinate,
    /// Build-variant name.
    pub flavor: String,
    /// Whether substitution is enabled.
    pub enabled: bool,
    /// Result of the external cache-validity check.
    pub cache_valid: bool,
}

impl ModuleSpec {
    /// An enabled, flavorless module whose cache is not (yet) valid.
    pub fn new(path: impl Into<String>, artifact: Coordinate) -> Self {
        Self {
            path: path.into(),
            artifact,
            flavor: String::new(),
            enabled: true,
            cache_valid: false,
        }
    }

    /// Sets the build-variant name.
    pub fn flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    /// Sets whether the module is enabled.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the cache-validity flag.
    pub fn cache_valid(mut self, cache_valid: bool) -> Self {
        self.cache_valid = cache_valid;
        self
    }
}

/// All registered modules, indexed by project path.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Arena<ModuleId, ModuleRecord>,
    by_path: HashMap<Ident, ModuleId>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module for a project already declared in `graph`.
    pub fn register(
        &mut self,
        graph: &ProjectGraph,
        spec: ModuleSpec,
    ) -> Result<ModuleId, GraphError> {
        let project = graph
            .find(&spec.path)
            .ok_or_else(|| GraphError::UnknownProject(spec.path.clone()))?;
        let path = graph.project(project).path();
        if self.by_path.contains_key(&path) {
            return Err(GraphError::DuplicateModule(spec.path));
        }
        let id = self.modules.alloc(ModuleRecord {
            path,
            project,
            enabled: spec.enabled,
            cache_valid: spec.cache_valid,
            flavor: spec.flavor,
            referenced: false,
            artifact: spec.artifact,
            dependency_modules: Vec::new(),
        });
        self.by_path.insert(path, id);
        Ok(id)
    }

    /// Looks up the module registered for a project path.
    pub fn lookup_by_path(&self, path: Ident) -> Option<ModuleId> {
        self.by_path.get(&path).copied()
    }

    /// Looks up the module wrapping the given project node.
    pub fn lookup_by_project(&self, graph: &ProjectGraph, project: ProjectId) -> Option<ModuleId> {
        self.lookup_by_path(graph.project(project).path())
    }

    /// Returns the record for `id`.
    pub fn get(&self, id: ModuleId) -> &ModuleRecord {
        &self.modules[id]
    }

    /// Returns the record for `id` for mutation.
    pub fn get_mut(&mut self, id: ModuleId) -> &mut ModuleRecord {
        &mut self.modules[id]
    }

    /// Iterates over all records in registration order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &ModuleRecord)> {
        self.modules.iter()
    }

    /// The number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
