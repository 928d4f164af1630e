//! The owned project graph: an arena of [`Project`] nodes keyed by path.

use std::collections::HashMap;

use kiln_common::{Ident, Interner};

use crate::arena::Arena;
use crate::error::GraphError;
use crate::ids::ProjectId;
use crate::model::Project;

/// Every project taking part in a rewrite pass.
///
/// Owns the interner for project paths, so each path maps to exactly one
/// [`Ident`] and one [`ProjectId`].
#[derive(Default)]
pub struct ProjectGraph {
    interner: Interner,
    projects: Arena<ProjectId, Project>,
    by_path: HashMap<Ident, ProjectId>,
}

impl ProjectGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The interner that owns all project paths in this graph.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Declares a new project. Paths must be unique.
    pub fn add_project(&mut self, path: &str) -> Result<ProjectId, GraphError> {
        let ident = self.interner.get_or_intern(path);
        if self.by_path.contains_key(&ident) {
            return Err(GraphError::DuplicateProject(path.to_string()));
        }
        let id = self.projects.alloc(Project::new(ident));
        self.by_path.insert(ident, id);
        Ok(id)
    }

    /// Finds a project by its path string.
    pub fn find(&self, path: &str) -> Option<ProjectId> {
        self.interner
            .get(path)
            .and_then(|ident| self.find_ident(ident))
    }

    /// Finds a project by its interned path.
    pub fn find_ident(&self, path: Ident) -> Option<ProjectId> {
        self.by_path.get(&path).copied()
    }

    /// Returns `true` if `id` belongs to this graph.
    pub fn contains(&self, id: ProjectId) -> bool {
        self.projects.contains(id)
    }

    /// Returns the project node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn project(&self, id: ProjectId) -> &Project {
        &self.projects[id]
    }

    /// Returns the project node for mutation.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn project_mut(&mut self, id: ProjectId) -> &mut Project {
        &mut self.projects[id]
    }

    /// The project's path as text.
    pub fn path(&self, id: ProjectId) -> &str {
        self.interner.resolve(self.projects[id].path())
    }

    /// Iterates over all projects in declaration order.
    pub fn projects(&self) -> impl Iterator<Item = (ProjectId, &Project)> {
        self.projects.iter()
    }

    /// The number of declared projects.
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Returns `true` if no project has been declared.
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
