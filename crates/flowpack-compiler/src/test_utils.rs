//! Test utilities: in-memory projects and resolution shortcuts.

use flowpack_core::ProjectGraph;

use crate::assets::AssetIndex;
use crate::build::BuildMode;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::model::ResolvedModel;
use crate::resolve;

pub fn graph(json: &str) -> ProjectGraph {
    ProjectGraph::from_json_str(json).expect("valid project")
}

pub fn resolve_graph(graph: &ProjectGraph, mode: BuildMode) -> (ResolvedModel, Diagnostics) {
    let mut diag = Diagnostics::new();
    let mut index = AssetIndex::new(graph, mode, None, &mut diag);
    let model = resolve::resolve(&mut index, &mut diag);
    (model, diag)
}

/// Resolve a single-project graph in `assets` mode.
pub fn resolve_json(json: &str) -> (ResolvedModel, Diagnostics) {
    resolve_graph(&graph(json), BuildMode::BuildAssets)
}

pub fn messages(diag: &Diagnostics, kind: DiagnosticKind) -> Vec<String> {
    diag.of_kind(kind).map(|m| m.message().to_string()).collect()
}
