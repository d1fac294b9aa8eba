//! flowpack compiler: resolves a project graph into an embedded asset blob.
//!
//! This crate provides the build pipeline:
//! - `assets` - asset indexer (stable indices, master-project layering)
//! - `flow_state` - per-flow component, input and widget item tables
//! - `constant_pool` - deduplicated literal values
//! - `expr` - property expression lexer, parser and lowering
//! - `resolve` - resolution into the owned [`model::ResolvedModel`]
//! - `emit` - binary blob, enum sections and LVGL source backends
//! - `map` - debugger map of the built assets
//! - `templates` - build file rendering
//! - `build` - the [`build()`] entry point

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod assets;
pub mod build;
pub mod constant_pool;
pub mod diagnostics;
pub mod emit;
pub mod expr;
pub mod flow_state;
pub mod map;
pub mod model;
pub mod resolve;
pub mod templates;

#[cfg(test)]
mod flow_state_tests;
#[cfg(test)]
mod templates_tests;
#[cfg(test)]
pub mod test_utils;

pub use build::{BuildMode, BuildOptions, BuildResult, SectionName, SectionOutput, build};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use map::AssetsMap;
pub use model::ResolvedModel;

/// Fatal build failures. Data problems are diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] flowpack_format::FormatError),

    #[error(transparent)]
    Project(#[from] flowpack_core::project::ProjectError),

    #[error("unknown section `{0}`")]
    InvalidSection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
