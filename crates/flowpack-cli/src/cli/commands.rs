//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("flowpack")
        .about("Compile GUI and flow projects into embedded asset blobs")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(log_level_arg())
        .subcommand(build_command())
        .subcommand(check_command())
        .subcommand(dump_command())
}

/// Build a project into sections or build files.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Build a project")
        .override_usage(
            "\
  flowpack build <PROJECT> [-o <DIR>]
  flowpack build <PROJECT> --mode assets -o <DIR>
  flowpack build <PROJECT> --section <NAME>...",
        )
        .after_help(
            r#"EXAMPLES:
  flowpack build app.json -o out/                        # all sections or build files
  flowpack build app.json --section GUI_PAGES_ENUM       # one section to stdout
  flowpack build app.json --mode assets -o out/          # data blob and map
  flowpack build app.json --configuration release -o out/"#,
        )
        .arg(project_arg())
        .arg(mode_arg())
        .arg(section_arg())
        .arg(configuration_arg())
        .arg(output_dir_arg())
        .arg(color_arg())
}

/// Validate a project without producing output.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a project")
        .after_help(
            r#"EXAMPLES:
  flowpack check app.json
  flowpack check app.json --configuration debug"#,
        )
        .arg(project_arg())
        .arg(configuration_arg())
        .arg(color_arg())
}

/// Describe a packed blob.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the contents of an assets blob")
        .arg(blob_arg())
        .arg(color_arg())
}
