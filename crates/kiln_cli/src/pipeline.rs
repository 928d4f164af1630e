//! Shared workspace loading used by all `kiln` subcommands.
//!
//! 1. Locate `kiln.toml` (explicit `--config` or walk up from the cwd)
//! 2. Load and validate it via `kiln_config`
//! 3. Build the project graph and module registry
//! 4. Apply `--invalidate` overrides and run one rewrite pass

use std::path::{Path, PathBuf};

use kiln_common::Coordinate;
use kiln_config::{
    DependencySpec, ExcludeSpec, ExclusionMatching, WorkspaceConfig, CONFIG_FILE_NAME,
};
use kiln_graph::{
    rewrite, ArtifactDependency, Dependency, ExclusionPolicy, ExclusionRule, ModuleRegistry,
    ModuleSpec, ProjectGraph, ProjectId, RewriteOptions, RewriteOutcome,
};

use crate::GlobalArgs;

/// A loaded workspace ready for a rewrite pass.
pub struct Workspace {
    /// All declared projects.
    pub graph: ProjectGraph,
    /// All registered modules.
    pub registry: ModuleRegistry,
    /// The project the pass starts from.
    pub root: ProjectId,
    /// Pass options derived from `[workspace]`.
    pub options: RewriteOptions,
}

/// Walks up from `start` looking for a directory containing `kiln.toml`.
pub fn find_workspace_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file from global CLI args.
///
/// `--config` may name the file itself or the directory holding it.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE_NAME))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_workspace_root(&std::env::current_dir()?)?.join(CONFIG_FILE_NAME)),
    }
}

/// Locates, loads and assembles the workspace.
pub fn load_workspace(global: &GlobalArgs) -> Result<Workspace, Box<dyn std::error::Error>> {
    let path = resolve_config_path(global)?;
    tracing::debug!(config = %path.display(), "loading workspace");
    let config = kiln_config::load_config_file(&path)?;
    build_workspace(&config)
}

/// Converts a validated configuration into a graph and registry.
pub fn build_workspace(config: &WorkspaceConfig) -> Result<Workspace, Box<dyn std::error::Error>> {
    let mut graph = ProjectGraph::new();
    for path in config.projects.keys() {
        graph.add_project(path)?;
    }

    for (path, project) in &config.projects {
        let id = find(&graph, path)?;
        for (name, spec) in &project.configurations {
            let mut dependencies = Vec::with_capacity(spec.dependencies.len());
            for dependency in &spec.dependencies {
                dependencies.push(convert_dependency(&graph, dependency)?);
            }
            let configuration = graph.project_mut(id).configuration_or_insert(name);
            for rule in &spec.excludes {
                configuration.add_exclude(convert_exclude(rule));
            }
            for dependency in dependencies {
                configuration.add(dependency);
            }
        }
    }

    let mut registry = ModuleRegistry::new();
    for module in &config.modules {
        let artifact: Coordinate = module.artifact.parse()?;
        let spec = ModuleSpec::new(&module.path, artifact)
            .flavor(&module.flavor)
            .enabled(module.enabled)
            .cache_valid(module.cache_valid);
        registry.register(&graph, spec)?;
    }

    let root = find(&graph, &config.workspace.root)?;
    let options = RewriteOptions {
        exclusion_policy: match config.workspace.exclusion_matching {
            ExclusionMatching::AllRules => ExclusionPolicy::AllRules,
            ExclusionMatching::FirstRule => ExclusionPolicy::FirstRule,
        },
    };

    Ok(Workspace {
        graph,
        registry,
        root,
        options,
    })
}

/// Forces the listed modules to be treated as cache misses.
///
/// Paths without a registered module are reported and otherwise ignored.
pub fn apply_invalidations(workspace: &mut Workspace, paths: &[String]) {
    for path in paths {
        let module = workspace
            .graph
            .interner()
            .get(path)
            .and_then(|ident| workspace.registry.lookup_by_path(ident));
        match module {
            Some(id) => workspace.registry.get_mut(id).cache_valid = false,
            None => tracing::warn!(path = %path, "--invalidate names no registered module"),
        }
    }
}

/// Runs one rewrite pass from the workspace root.
pub fn run_pass(workspace: &mut Workspace) -> Result<RewriteOutcome, Box<dyn std::error::Error>> {
    let outcome = rewrite(
        &mut workspace.graph,
        &mut workspace.registry,
        workspace.root,
        &workspace.options,
    )?;
    Ok(outcome)
}

fn find(graph: &ProjectGraph, path: &str) -> Result<ProjectId, Box<dyn std::error::Error>> {
    graph
        .find(path)
        .ok_or_else(|| format!("unknown project '{path}'").into())
}

fn convert_dependency(
    graph: &ProjectGraph,
    spec: &DependencySpec,
) -> Result<Dependency, Box<dyn std::error::Error>> {
    Ok(match spec {
        DependencySpec::Project { project } => Dependency::Project(find(graph, project)?),
        DependencySpec::Artifact { artifact, excludes } => {
            let mut dependency = ArtifactDependency::new(artifact.parse()?);
            dependency
                .excludes
                .extend(excludes.iter().map(convert_exclude));
            Dependency::Artifact(dependency)
        }
        DependencySpec::Coordinate(artifact) => Dependency::artifact(artifact.parse()?),
    })
}

fn convert_exclude(spec: &ExcludeSpec) -> ExclusionRule {
    match spec.module.as_deref() {
        Some(module) if !module.is_empty() => ExclusionRule::module(&spec.group, module),
        _ => ExclusionRule::group(&spec.group),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WORKSPACE: &str = r#"
[workspace]
root = ":app"

[[modules]]
path = ":lib"
artifact = "g:lib:1.0"
cache_valid = true

[[modules]]
path = ":core"
artifact = "g:core:1.0"

[projects.":app".configurations.implementation]
dependencies = [{ project = ":lib" }]

[projects.":lib".configurations.implementation]
dependencies = [{ project = ":core" }, "g:x:2.0"]
excludes = [{ group = "org.junk" }]

[projects.":core"]
"#;

    fn workspace() -> Workspace {
        let config = kiln_config::load_config_from_str(WORKSPACE).unwrap();
        build_workspace(&config).unwrap()
    }

    #[test]
    fn find_workspace_root_in_current_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), WORKSPACE).unwrap();
        assert_eq!(find_workspace_root(tmp.path()).unwrap(), tmp.path());
    }

    #[test]
    fn find_workspace_root_in_parent() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), WORKSPACE).unwrap();
        let sub = tmp.path().join("feature").join("login");
        fs::create_dir_all(&sub).unwrap();
        assert_eq!(find_workspace_root(&sub).unwrap(), tmp.path());
    }

    #[test]
    fn find_workspace_root_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = find_workspace_root(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("could not find kiln.toml"));
    }

    #[test]
    fn resolve_config_path_accepts_directory() {
        let tmp = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(tmp.path().display().to_string()),
        };
        assert_eq!(
            resolve_config_path(&global).unwrap(),
            tmp.path().join(CONFIG_FILE_NAME)
        );
    }

    #[test]
    fn build_workspace_converts_everything() {
        let ws = workspace();
        assert_eq!(ws.graph.len(), 3);
        assert_eq!(ws.registry.len(), 2);
        assert_eq!(ws.graph.path(ws.root), ":app");

        let lib = ws.graph.find(":lib").unwrap();
        let conf = ws.graph.project(lib).configuration("implementation").unwrap();
        assert_eq!(conf.dependencies().len(), 2);
        assert_eq!(conf.excludes(), &[ExclusionRule::group("org.junk")]);
    }

    #[test]
    fn run_pass_rewrites_root() {
        let mut ws = workspace();
        let outcome = run_pass(&mut ws).unwrap();
        assert_eq!(outcome.substitutions.len(), 1);
        assert_eq!(outcome.build_requests.len(), 1);
        assert_eq!(outcome.build_requests[0].path, ":core");

        let app = ws.graph.find(":app").unwrap();
        let deps = ws
            .graph
            .project(app)
            .configuration("implementation")
            .unwrap()
            .dependencies()
            .to_vec();
        // :lib's remaining source edge to :core comes along with its artifacts.
        let core = ws.graph.find(":core").unwrap();
        assert!(deps.contains(&Dependency::artifact("g:lib:1.0".parse().unwrap())));
        assert!(deps.contains(&Dependency::Project(core)));
    }

    #[test]
    fn invalidation_turns_hit_into_miss() {
        let mut ws = workspace();
        apply_invalidations(&mut ws, &[":lib".to_string(), ":ghost".to_string()]);
        let outcome = run_pass(&mut ws).unwrap();
        assert!(outcome.substitutions.is_empty());
        let planned: Vec<_> = outcome
            .build_requests
            .iter()
            .map(|r| r.path.as_str())
            .collect();
        assert_eq!(planned, vec![":lib", ":core"]);
    }
}
