pub mod build;
pub mod check;
pub mod dump;


use std::path::PathBuf;

use flowpack_compiler::Diagnostics;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] flowpack_core::project::ProjectError),

    #[error(transparent)]
    Build(#[from] flowpack_compiler::Error),

    #[error(transparent)]
    Format(#[from] flowpack_format::FormatError),

    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Exit with status 1 after printing `err`.
fn fail(err: CliError) -> ! {
    eprintln!("error: {}", err);
    std::process::exit(1);
}

fn print_diagnostics(diagnostics: &Diagnostics, color: bool) {
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{}", diagnostics.printer().colored(color).render());
    log::info!(
        "{} error(s), {} warning(s)",
        diagnostics.error_count(),
        diagnostics.warning_count()
    );
}
