//! Configuration types deserialized from `kiln.toml`.

use std::collections::BTreeMap;

use serde::Deserialize;

/// The top-level workspace description parsed from `kiln.toml`.
#[derive(Debug, Deserialize)]
pub struct WorkspaceConfig {
    /// Workspace-wide settings.
    pub workspace: WorkspaceMeta,
    /// Modules eligible for artifact substitution.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
    /// Every project in the build, keyed by path.
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

/// Workspace-wide settings.
#[derive(Debug, Deserialize)]
pub struct WorkspaceMeta {
    /// Path of the project a rewrite pass starts from, e.g. `:app`.
    pub root: String,
    /// How configuration exclusion rules are matched.
    #[serde(default)]
    pub exclusion_matching: ExclusionMatching,
}

/// Exclusion matching mode.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionMatching {
    /// Every rule on a configuration is consulted (default).
    #[default]
    AllRules,
    /// Only the first rule on a configuration is consulted.
    FirstRule,
}

/// A module that may be swapped for its prebuilt artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleConfig {
    /// The wrapped project's path.
    pub path: String,
    /// The artifact coordinates in `group:name:version` form.
    pub artifact: String,
    /// Build-variant name, empty for none.
    #[serde(default)]
    pub flavor: String,
    /// Whether substitution is enabled for this module.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether the cached artifact is up to date.
    #[serde(default)]
    pub cache_valid: bool,
}

fn default_true() -> bool {
    true
}

/// One project's declared configurations.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Configurations keyed by name, e.g. `implementation` or `debugApi`.
    #[serde(default)]
    pub configurations: BTreeMap<String, ConfigurationSpec>,
}

/// The contents of one configuration.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigurationSpec {
    /// Declared dependencies in order.
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    /// Exclusion rules applying to the whole configuration.
    #[serde(default)]
    pub excludes: Vec<ExcludeSpec>,
}

/// A single dependency declaration.
///
/// Uses serde's untagged enum to accept `{ project = ":lib" }`,
/// `{ artifact = "g:n:v", excludes = [...] }` or a bare `"g:n:v"` string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DependencySpec {
    /// A source reference to another project.
    Project {
        /// The referenced project's path.
        project: String,
    },
    /// An artifact with per-edge exclusions.
    Artifact {
        /// Coordinates in `group:name:version` form.
        artifact: String,
        /// Exclusions applying only to this edge.
        #[serde(default)]
        excludes: Vec<ExcludeSpec>,
    },
    /// A bare artifact coordinate string.
    Coordinate(String),
}

/// An exclusion rule. Omitting `module` excludes the whole group.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExcludeSpec {
    /// The artifact group to exclude.
    pub group: String,
    /// The artifact name to exclude.
    #[serde(default)]
    pub module: Option<String>,
}
