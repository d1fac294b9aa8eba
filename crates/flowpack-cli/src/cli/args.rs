//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be
//! composed into several commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

use flowpack_compiler::SectionName;

/// Project file (positional).
pub fn project_arg() -> Arg {
    Arg::new("project")
        .value_name("PROJECT")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Project file (JSON)")
}

/// Assets blob (positional).
pub fn blob_arg() -> Arg {
    Arg::new("blob")
        .value_name("BLOB")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Packed assets blob")
}

/// Build mode (--mode).
pub fn mode_arg() -> Arg {
    Arg::new("mode")
        .long("mode")
        .value_name("MODE")
        .default_value("files")
        .value_parser(["check", "assets", "files"])
        .help("Diagnostics only, the data blob with its map, or source sections")
}

/// Requested section, repeatable (--section).
pub fn section_arg() -> Arg {
    Arg::new("section")
        .long("section")
        .value_name("NAME")
        .action(ArgAction::Append)
        .value_parser(SectionName::ALL.iter().map(|s| s.as_str()).collect::<Vec<_>>())
        .help("Produce only this section (repeatable)")
}

/// Build configuration (--configuration).
pub fn configuration_arg() -> Arg {
    Arg::new("configuration")
        .long("configuration")
        .value_name("NAME")
        .help("Build configuration used for `usedIn` filtering")
}

/// Output directory (-o/--output).
pub fn output_dir_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("DIR")
        .value_parser(value_parser!(PathBuf))
        .help("Write sections into this directory instead of stdout")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Log filter (--log-level).
pub fn log_level_arg() -> Arg {
    Arg::new("log_level")
        .long("log-level")
        .value_name("LEVEL")
        .global(true)
        .default_value("warn")
        .value_parser(["off", "error", "warn", "info", "debug", "trace"])
        .help("Log level (RUST_LOG refines it per module)")
}
