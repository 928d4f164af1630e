//! Configuration-level exclusion matching.

use crate::model::{Configuration, Dependency};

/// How many of a configuration's exclusion rules are consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExclusionPolicy {
    /// A dependency is excluded if any rule matches it.
    #[default]
    AllRules,
    /// Only the first declared rule is consulted. Matches the behaviour of
    /// build setups that assume one exclusion per configuration.
    FirstRule,
}

/// Returns `true` if `dependency` is covered by one of `configuration`'s
/// exclusion rules.
///
/// Only artifact dependencies can be excluded; a source reference never
/// matches.
pub fn is_excluded(
    configuration: &Configuration,
    dependency: &Dependency,
    policy: ExclusionPolicy,
) -> bool {
    let Some(artifact) = dependency.as_artifact() else {
        return false;
    };
    let rules = configuration.excludes();
    match policy {
        ExclusionPolicy::AllRules => rules.iter().any(|r| r.matches(&artifact.coordinate)),
        ExclusionPolicy::FirstRule => rules
            .first()
            .is_some_and(|r| r.matches(&artifact.coordinate)),
    }
}
