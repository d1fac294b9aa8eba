//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgMatches;
use env_logger::Builder;
use log::LevelFilter;

use flowpack_compiler::{BuildMode, SectionName};

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::check::CheckArgs;
use crate::commands::dump::DumpArgs;

pub struct BuildParams {
    pub project: PathBuf,
    pub mode: BuildMode,
    pub sections: Vec<SectionName>,
    pub configuration: Option<String>,
    pub output: Option<PathBuf>,
    pub color: ColorChoice,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let mode = m
            .get_one::<String>("mode")
            .and_then(|s| s.parse().ok())
            .unwrap_or(BuildMode::BuildFiles);
        let sections = m
            .get_many::<String>("section")
            .map(|values| values.filter_map(|s| s.parse().ok()).collect())
            .unwrap_or_default();

        Self {
            project: project_path(m, "project"),
            mode,
            sections,
            configuration: m.get_one::<String>("configuration").cloned(),
            output: m.get_one::<PathBuf>("output").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            project: p.project,
            mode: p.mode,
            sections: p.sections,
            configuration: p.configuration,
            output: p.output,
            color: p.color.should_colorize(),
        }
    }
}

pub struct CheckParams {
    pub project: PathBuf,
    pub configuration: Option<String>,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            project: project_path(m, "project"),
            configuration: m.get_one::<String>("configuration").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            project: p.project,
            configuration: p.configuration,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub blob: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            blob: project_path(m, "blob"),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            blob: p.blob,
            color: p.color.should_colorize(),
        }
    }
}

/// Install the logger. `--log-level` sets the global filter, `RUST_LOG`
/// directives for individual modules still apply.
pub fn init_logging(m: &ArgMatches) {
    let level = log_level(m);
    let mut builder = Builder::from_default_env();
    builder.filter_level(level).format_timestamp(None);
    let _ = builder.try_init();
}

pub(super) fn log_level(m: &ArgMatches) -> LevelFilter {
    m.get_one::<String>("log_level")
        .and_then(|s| LevelFilter::from_str(s).ok())
        .unwrap_or(LevelFilter::Warn)
}

fn project_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
