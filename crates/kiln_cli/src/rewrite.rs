//! `kiln rewrite`: run one substitution pass and report the result.
//!
//! Prints every project's configurations as they look after the pass, the
//! substituted edges, each module's state and the de-duplicated build plan.

use serde::Serialize;

use kiln_graph::{BuildPlan, Dependency, ProjectGraph, RewriteOutcome};

use crate::pipeline::{apply_invalidations, load_workspace, run_pass, Workspace};
use crate::{GlobalArgs, ReportFormat, RewriteArgs};

/// The serializable result of a pass.
#[derive(Debug, Serialize)]
pub struct RewriteReport {
    /// The root project path.
    pub root: String,
    /// Every project after the pass, in path order.
    pub projects: Vec<ProjectReport>,
    /// Edges swapped for artifacts.
    pub substitutions: Vec<SubstitutionReport>,
    /// Every registered module's post-pass state.
    pub modules: Vec<ModuleReport>,
    /// Modules that need building.
    pub build_plan: BuildPlan,
    /// Dependencies copied into parents.
    pub propagated: usize,
    /// Project visits during the pass.
    pub visited: usize,
}

/// One project's rewritten configurations.
#[derive(Debug, Serialize)]
pub struct ProjectReport {
    /// The project path.
    pub path: String,
    /// Its configurations in declaration order.
    pub configurations: Vec<ConfigurationReport>,
}

/// One configuration's contents.
#[derive(Debug, Serialize)]
pub struct ConfigurationReport {
    /// The configuration name.
    pub name: String,
    /// Rendered dependencies.
    pub dependencies: Vec<String>,
    /// Rendered configuration-wide exclusion rules.
    pub excludes: Vec<String>,
}

/// A substituted edge.
#[derive(Debug, Serialize)]
pub struct SubstitutionReport {
    /// The rewritten project.
    pub project: String,
    /// The rewritten configuration.
    pub configuration: String,
    /// The artifact now declared.
    pub artifact: String,
}

/// A module's state after the pass.
#[derive(Debug, Serialize)]
pub struct ModuleReport {
    /// The module's project path.
    pub path: String,
    /// Whether substitution is enabled.
    pub enabled: bool,
    /// Whether the cached artifact was valid.
    pub cache_valid: bool,
    /// Whether anything depended on it.
    pub referenced: bool,
    /// Observed module dependencies, in visit order.
    pub dependencies: Vec<String>,
}

/// Runs the `kiln rewrite` command.
pub fn run(args: &RewriteArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut workspace = load_workspace(global)?;
    apply_invalidations(&mut workspace, &args.invalidate);

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Rewriting {} ({} projects, {} modules)",
            workspace.graph.path(workspace.root),
            workspace.graph.len(),
            workspace.registry.len()
        );
    }

    let outcome = run_pass(&mut workspace)?;
    let report = build_report(&workspace, &outcome);

    if let Some(ref plan_path) = args.plan {
        let json = serde_json::to_string_pretty(&report.build_plan)?;
        std::fs::write(plan_path, json)?;
        tracing::info!(path = %plan_path, builds = report.build_plan.len(), "wrote build plan");
    }

    match args.format {
        ReportFormat::Text => print_text(&report, global),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(0)
}

/// Collects the post-pass state into a report.
pub fn build_report(workspace: &Workspace, outcome: &RewriteOutcome) -> RewriteReport {
    let graph = &workspace.graph;
    let projects = graph
        .projects()
        .map(|(id, project)| ProjectReport {
            path: graph.path(id).to_string(),
            configurations: project
                .configurations()
                .iter()
                .map(|c| ConfigurationReport {
                    name: c.name().to_string(),
                    dependencies: c
                        .dependencies()
                        .iter()
                        .map(|d| render_dependency(graph, d))
                        .collect(),
                    excludes: c.excludes().iter().map(|r| r.to_string()).collect(),
                })
                .collect(),
        })
        .collect();

    let substitutions = outcome
        .substitutions
        .iter()
        .map(|s| SubstitutionReport {
            project: graph.path(s.project).to_string(),
            configuration: s.configuration.clone(),
            artifact: s.artifact.to_string(),
        })
        .collect();

    let modules = workspace
        .registry
        .modules()
        .map(|(_, record)| ModuleReport {
            path: graph.interner().resolve(record.path).to_string(),
            enabled: record.enabled,
            cache_valid: record.cache_valid,
            referenced: record.referenced,
            dependencies: record
                .dependency_modules
                .iter()
                .map(|&m| {
                    let path = workspace.registry.get(m).path;
                    graph.interner().resolve(path).to_string()
                })
                .collect(),
        })
        .collect();

    RewriteReport {
        root: graph.path(workspace.root).to_string(),
        projects,
        substitutions,
        modules,
        build_plan: BuildPlan::from_requests(&outcome.build_requests),
        propagated: outcome.propagated,
        visited: outcome.visited,
    }
}

/// Renders a dependency as `group:name:version` or `project(:path)`.
pub fn render_dependency(graph: &ProjectGraph, dependency: &Dependency) -> String {
    match dependency {
        Dependency::Project(id) => format!("project({})", graph.path(*id)),
        Dependency::Artifact(artifact) if artifact.excludes.is_empty() => {
            artifact.coordinate.to_string()
        }
        Dependency::Artifact(artifact) => {
            let excludes: Vec<String> = artifact.excludes.iter().map(|r| r.to_string()).collect();
            format!("{} (exclude {})", artifact.coordinate, excludes.join(", "))
        }
    }
}

fn print_text(report: &RewriteReport, global: &GlobalArgs) {
    for project in &report.projects {
        println!("{}", project.path);
        for conf in &project.configurations {
            println!("  {}", conf.name);
            for dependency in &conf.dependencies {
                println!("    {dependency}");
            }
        }
    }

    if global.quiet {
        return;
    }
    eprintln!(
        "   Substituted {} edge(s), propagated {} dependency(ies), {} build(s) planned",
        report.substitutions.len(),
        report.propagated,
        report.build_plan.len()
    );
    for build in report.build_plan.builds() {
        eprintln!("     build {} -> {}", build.path, build.artifact);
    }
}
