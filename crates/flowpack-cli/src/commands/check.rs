use std::path::PathBuf;

use flowpack_compiler::{BuildMode, BuildOptions, build};
use flowpack_core::ProjectGraph;

use super::{CliError, fail, print_diagnostics};

pub struct CheckArgs {
    pub project: PathBuf,
    pub configuration: Option<String>,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    match execute(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => fail(err),
    }
}

/// Check the project; `Ok(false)` when errors were reported.
pub fn execute(args: &CheckArgs) -> Result<bool, CliError> {
    let graph = ProjectGraph::load(&args.project)?;
    let mut options = BuildOptions::new(BuildMode::Check);
    options.configuration = args.configuration.clone();

    let result = build(&graph, &options)?;
    print_diagnostics(&result.diagnostics, args.color);

    // Silent on success (like cargo check)
    Ok(!result.diagnostics.has_errors())
}
