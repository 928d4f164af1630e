//! `kiln graph`: print the module dependency graph observed by a pass.

use kiln_graph::export::{module_graph, to_adjacency, to_dot};

use crate::pipeline::{load_workspace, run_pass};
use crate::{GlobalArgs, GraphArgs, GraphFormat};

/// Runs the `kiln graph` command.
pub fn run(args: &GraphArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut workspace = load_workspace(global)?;
    run_pass(&mut workspace)?;

    let modules = module_graph(&workspace.registry, &workspace.graph);
    match args.format {
        GraphFormat::Dot => println!("{}", to_dot(&modules)),
        GraphFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&to_adjacency(&modules))?)
        }
    }
    Ok(0)
}
