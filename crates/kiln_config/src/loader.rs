//! Configuration file loading and validation.

use std::collections::HashSet;
use std::path::Path;

use kiln_common::Coordinate;

use crate::error::ConfigError;
use crate::types::{DependencySpec, ExcludeSpec, WorkspaceConfig};

/// The file name looked up in a workspace directory.
pub const CONFIG_FILE_NAME: &str = "kiln.toml";

/// Loads and validates `<workspace_dir>/kiln.toml`.
pub fn load_config(workspace_dir: &Path) -> Result<WorkspaceConfig, ConfigError> {
    load_config_file(&workspace_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `kiln.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<WorkspaceConfig, ConfigError> {
    let config: WorkspaceConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that every referenced project is declared and every coordinate
/// and exclusion rule is well-formed.
fn validate_config(config: &WorkspaceConfig) -> Result<(), ConfigError> {
    let root = &config.workspace.root;
    if root.is_empty() {
        return Err(ConfigError::MissingField("workspace.root".to_string()));
    }
    ensure_declared(config, root)?;

    let mut seen = HashSet::new();
    for module in &config.modules {
        if module.path.is_empty() {
            return Err(ConfigError::MissingField("modules.path".to_string()));
        }
        ensure_declared(config, &module.path)?;
        if !seen.insert(module.path.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "module '{}' is listed more than once",
                module.path
            )));
        }
        parse_coordinate(&module.artifact)?;
    }

    for (path, project) in &config.projects {
        for (name, configuration) in &project.configurations {
            validate_excludes(&configuration.excludes, path, name)?;
            for dependency in &configuration.dependencies {
                match dependency {
                    DependencySpec::Project { project } => ensure_declared(config, project)?,
                    DependencySpec::Artifact { artifact, excludes } => {
                        parse_coordinate(artifact)?;
                        validate_excludes(excludes, path, name)?;
                    }
                    DependencySpec::Coordinate(artifact) => {
                        parse_coordinate(artifact)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn ensure_declared(config: &WorkspaceConfig, path: &str) -> Result<(), ConfigError> {
    if config.projects.contains_key(path) {
        Ok(())
    } else {
        Err(ConfigError::UnknownProject(path.to_string()))
    }
}

fn parse_coordinate(s: &str) -> Result<Coordinate, ConfigError> {
    s.parse()
        .map_err(|e: kiln_common::ParseCoordinateError| ConfigError::ValidationError(e.to_string()))
}

fn validate_excludes(
    excludes: &[ExcludeSpec],
    project: &str,
    configuration: &str,
) -> Result<(), ConfigError> {
    if excludes.iter().any(|e| e.group.is_empty()) {
        return Err(ConfigError::ValidationError(format!(
            "exclusion rule without a group in {project} '{configuration}'"
        )));
    }
    Ok(())
}
