//! Error types for graph construction and rewrite passes.

use crate::ids::ProjectId;

/// Errors raised while assembling a [`ProjectGraph`](crate::graph::ProjectGraph)
/// or [`ModuleRegistry`](crate::registry::ModuleRegistry).
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Two projects were declared with the same path.
    #[error("project '{0}' is declared more than once")]
    DuplicateProject(String),

    /// Two module records were registered for the same project path.
    #[error("module '{0}' is registered more than once")]
    DuplicateModule(String),

    /// A path does not name any project in the graph.
    #[error("unknown project '{0}'")]
    UnknownProject(String),
}

/// Errors that abort a rewrite pass.
///
/// Absent registry entries, disabled modules, cache misses and missing
/// configuration variants are ordinary outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// A project was reached again while its own subtree was still being
    /// rewritten.
    #[error("dependency cycle detected: {}", cycle.join(" -> "))]
    Cycle {
        /// The project paths forming the cycle, first and last equal.
        cycle: Vec<String>,
    },

    /// The requested root path is not part of the graph.
    #[error("unknown root project '{0}'")]
    UnknownProject(String),

    /// The root id was not issued by this graph.
    #[error("root project id {} does not belong to this graph", .0.as_raw())]
    InvalidRoot(ProjectId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_cycle() {
        let err = RewriteError::Cycle {
            cycle: vec![":a".into(), ":b".into(), ":a".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle detected: :a -> :b -> :a");
    }

    #[test]
    fn display_unknown_root() {
        let err = RewriteError::UnknownProject(":nope".into());
        assert_eq!(err.to_string(), "unknown root project ':nope'");
    }

    #[test]
    fn display_invalid_root() {
        let err = RewriteError::InvalidRoot(ProjectId::from_raw(7));
        assert_eq!(
            err.to_string(),
            "root project id 7 does not belong to this graph"
        );
    }

    #[test]
    fn display_duplicate_project() {
        let err = GraphError::DuplicateProject(":app".into());
        assert_eq!(err.to_string(), "project ':app' is declared more than once");
    }

    #[test]
    fn display_duplicate_module() {
        let err = GraphError::DuplicateModule(":lib".into());
        assert_eq!(err.to_string(), "module ':lib' is registered more than once");
    }
}
