use std::path::PathBuf;

use log::LevelFilter;

use flowpack_compiler::{BuildMode, SectionName};

use super::dispatch::log_level;
use super::*;
use crate::cli::commands::{build_command, check_command, dump_command};

#[test]
fn build_defaults_to_files_mode_and_all_sections() {
    let m = build_command()
        .try_get_matches_from(["build", "app.json"])
        .expect("valid args");
    let params = BuildParams::from_matches(&m);

    assert_eq!(params.project, PathBuf::from("app.json"));
    assert_eq!(params.mode, BuildMode::BuildFiles);
    assert!(params.sections.is_empty());
    assert_eq!(params.configuration, None);
    assert_eq!(params.output, None);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn build_collects_repeated_sections_in_order() {
    let m = build_command()
        .try_get_matches_from([
            "build",
            "app.json",
            "--section",
            "GUI_PAGES_ENUM",
            "--section",
            "GUI_ASSETS_DATA",
            "--mode",
            "assets",
            "--configuration",
            "release",
            "-o",
            "out",
            "--color",
            "never",
        ])
        .expect("valid args");
    let params = BuildParams::from_matches(&m);

    assert_eq!(
        params.sections,
        [SectionName::PagesEnum, SectionName::AssetsData]
    );
    assert_eq!(params.mode, BuildMode::BuildAssets);
    assert_eq!(params.configuration.as_deref(), Some("release"));
    assert_eq!(params.output, Some(PathBuf::from("out")));
    assert_eq!(params.color, ColorChoice::Never);
}

#[test]
fn build_rejects_unknown_sections() {
    let result = build_command().try_get_matches_from(["build", "app.json", "--section", "GUI_NOPE"]);
    assert!(result.is_err());
}

#[test]
fn build_mode_is_validated() {
    let m = build_command()
        .try_get_matches_from(["build", "app.json", "--mode", "check"])
        .expect("valid args");
    assert_eq!(BuildParams::from_matches(&m).mode, BuildMode::Check);

    let result = build_command().try_get_matches_from(["build", "app.json", "--mode", "all"]);
    assert!(result.is_err());
}

#[test]
fn check_requires_a_project() {
    assert!(check_command().try_get_matches_from(["check"]).is_err());

    let m = check_command()
        .try_get_matches_from(["check", "app.json", "--configuration", "debug"])
        .expect("valid args");
    let params = CheckParams::from_matches(&m);
    assert_eq!(params.project, PathBuf::from("app.json"));
    assert_eq!(params.configuration.as_deref(), Some("debug"));
}

#[test]
fn dump_takes_a_blob_path() {
    let m = dump_command()
        .try_get_matches_from(["dump", "assets.bin", "--color", "always"])
        .expect("valid args");
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.blob, PathBuf::from("assets.bin"));
    assert_eq!(params.color, ColorChoice::Always);
}

#[test]
fn dump_has_no_build_flags() {
    let result = dump_command().try_get_matches_from(["dump", "assets.bin", "--section", "GUI_ASSETS_DATA"]);
    assert!(result.is_err());
}

#[test]
fn log_level_defaults_to_warn() {
    let m = build_cli()
        .try_get_matches_from(["flowpack", "check", "app.json"])
        .expect("valid args");
    assert_eq!(log_level(&m), LevelFilter::Warn);

    let m = build_cli()
        .try_get_matches_from(["flowpack", "--log-level", "debug", "check", "app.json"])
        .expect("valid args");
    assert_eq!(log_level(&m), LevelFilter::Debug);
}

#[test]
fn subcommand_is_required() {
    assert!(build_cli().try_get_matches_from(["flowpack"]).is_err());
}

#[test]
fn cli_definition_is_consistent() {
    build_cli().debug_assert();
}
