//! Dependency-substitution core for modular builds.
//!
//! Given a [`ProjectGraph`] and a [`ModuleRegistry`] whose records already
//! know whether their cached artifacts are valid, a [`rewrite`] pass walks
//! the graph from a root project and:
//!
//! - replaces each source reference to an enabled, cache-valid module with
//!   that module's binary artifact;
//! - emits a [`BuildRequest`] for each enabled module whose cache is stale;
//! - re-threads a substituted module's own dependencies into its parent,
//!   once per build-variant prefix, honouring exclusion rules on both sides.
//!
//! # Usage
//!
//! ```ignore
//! let outcome = rewrite_path(&mut graph, &mut registry, ":app", &RewriteOptions::default())?;
//! let plan = BuildPlan::from_requests(&outcome.build_requests);
//! ```

#![warn(missing_docs)]

pub mod arena;
pub mod error;
pub mod exclusion;
pub mod export;
pub mod graph;
pub mod ids;
pub mod model;
pub mod propagate;
pub mod registry;
pub mod rewrite;
pub mod schedule;
pub mod variant;

pub use error::{GraphError, RewriteError};
pub use exclusion::{is_excluded, ExclusionPolicy};
pub use graph::ProjectGraph;
pub use ids::{ModuleId, ProjectId};
pub use model::{ArtifactDependency, Configuration, Dependency, ExclusionRule, Project};
pub use propagate::propagate;
pub use registry::{ModuleRecord, ModuleRegistry, ModuleSpec};
pub use rewrite::{rewrite, rewrite_path, RewriteOptions, RewriteOutcome, Substitution};
pub use schedule::{dispatch, BuildPlan, BuildRequest, BuildScheduler};
