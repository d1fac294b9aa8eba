use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flowpack_compiler::templates::render_build_files;
use flowpack_compiler::{BuildMode, BuildOptions, BuildResult, SectionName, SectionOutput, build};
use flowpack_core::ProjectGraph;

use super::{CliError, fail, print_diagnostics};

pub struct BuildArgs {
    pub project: PathBuf,
    pub mode: BuildMode,
    /// Empty means every section the mode produces.
    pub sections: Vec<SectionName>,
    pub configuration: Option<String>,
    pub output: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: BuildArgs) {
    match execute(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => fail(err),
    }
}

/// Build and write the output; `Ok(false)` when errors were reported.
pub fn execute(args: &BuildArgs) -> Result<bool, CliError> {
    let graph = ProjectGraph::load(&args.project)?;
    let layered = graph.master_project().is_some();

    let mut options = BuildOptions::new(args.mode);
    options.configuration = args.configuration.clone();
    if !args.sections.is_empty() {
        options = options.sections(args.sections.iter().copied());
    }

    let diagnostics = match &args.output {
        Some(dir) if uses_templates(args, &graph, layered) => {
            let (files, diagnostics) = render_build_files(&graph, &options)?;
            create_dir(dir)?;
            for file in files {
                write_file(&dir.join(&file.file_name), file.contents.as_bytes())?;
            }
            diagnostics
        }
        Some(dir) => {
            let result = build(&graph, &options)?;
            create_dir(dir)?;
            write_sections(dir, &result, layered.then(|| project_stem(&args.project)))?;
            result.diagnostics
        }
        None => {
            let result = build(&graph, &options)?;
            print_sections(&result)?;
            result.diagnostics
        }
    };

    print_diagnostics(&diagnostics, args.color);
    Ok(!diagnostics.has_errors())
}

fn uses_templates(args: &BuildArgs, graph: &ProjectGraph, layered: bool) -> bool {
    args.mode == BuildMode::BuildFiles
        && args.sections.is_empty()
        && !layered
        && !graph.root_project().settings.build_files.is_empty()
}

/// Path of each produced section inside `dir`.
///
/// Layered builds are named after the project: `<stem>.res` and `<stem>.res.map`.
pub fn section_path(dir: &Path, name: SectionName, layered_stem: Option<&str>) -> PathBuf {
    match (layered_stem, name) {
        (Some(stem), SectionName::AssetsData) => dir.join(format!("{stem}.res")),
        (Some(stem), SectionName::AssetsDataMap) => dir.join(format!("{stem}.res.map")),
        _ => dir.join(format!("{}.{}", name.as_str(), name.extension())),
    }
}

fn write_sections(
    dir: &Path,
    result: &BuildResult,
    layered_stem: Option<String>,
) -> Result<(), CliError> {
    for (&name, output) in &result.sections {
        let path = section_path(dir, name, layered_stem.as_deref());
        write_file(&path, output.as_bytes())?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

fn print_sections(result: &BuildResult) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let labeled = result.sections.len() > 1;
    for (name, output) in &result.sections {
        let written = match output {
            SectionOutput::Text(text) if labeled => writeln!(out, "// {name}\n{text}"),
            SectionOutput::Text(text) => writeln!(out, "{text}"),
            SectionOutput::Binary(bytes) => out.write_all(bytes),
        };
        written.map_err(|source| CliError::Write {
            path: PathBuf::from("<stdout>"),
            source,
        })?;
    }
    Ok(())
}

fn project_stem(project: &Path) -> String {
    project
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "assets".to_string())
}

fn create_dir(dir: &Path) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
