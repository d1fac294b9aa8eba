use flowpack_core::ProjectGraph;
use flowpack_core::project::{Page, Variable};
use indoc::indoc;

use super::{AssetIndex, AssetRef};
use crate::build::BuildMode;
use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceRef};

fn graph(json: &str) -> ProjectGraph {
    ProjectGraph::from_json_str(json).expect("valid project")
}

fn page_names<'g>(graph: &'g ProjectGraph, index: &AssetIndex<'_>) -> Vec<&'g str> {
    index
        .pages
        .items()
        .map(|&h| graph.get::<Page>(h).name.as_str())
        .collect()
}

fn variable_names<'g>(graph: &'g ProjectGraph, index: &AssetIndex<'_>) -> Vec<&'g str> {
    index
        .variables
        .items()
        .map(|&h| graph.get::<Variable>(h).name.as_str())
        .collect()
}

fn messages(diag: &Diagnostics, kind: DiagnosticKind) -> Vec<String> {
    diag.of_kind(kind).map(|m| m.message().to_string()).collect()
}

#[test]
fn ided_pages_land_at_id_minus_one() {
    let g = graph(indoc! {r#"
        { "pages": [
            { "name": "b", "id": 2 },
            { "name": "c" },
            { "name": "a", "id": 1 }
        ] }
    "#});
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert_eq!(page_names(&g, &index), ["a", "b", "c"]);
    assert!(diag.is_empty());
}

#[test]
fn page_holes_are_warned_and_back_filled() {
    let g = graph(indoc! {r#"
        { "pages": [
            { "name": "a", "id": 1 },
            { "name": "c", "id": 3 }
        ] }
    "#});
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert_eq!(page_names(&g, &index), ["a", "a", "c"]);
    assert!(index.pages.slots()[1].filler);
    assert_eq!(
        messages(&diag, DiagnosticKind::MissingId),
        ["Missing page with ID = 2"]
    );
    assert_eq!(index.flows().len(), 2);
}

#[test]
fn ids_beyond_the_reference_range_are_appended() {
    let g = graph(indoc! {r#"
        { "pages": [
            { "name": "big", "id": 4000000000 },
            { "name": "a", "id": 1 },
            { "name": "c" }
        ] }
    "#});
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert_eq!(page_names(&g, &index), ["a", "c", "big"]);
    assert_eq!(
        messages(&diag, DiagnosticKind::AssetIdOutOfRange),
        ["page with ID = 4000000000 is out of range"]
    );
    assert!(diag.has_errors());
}

#[test]
fn oversized_references_encode_as_unresolved() {
    assert_eq!(AssetRef::Local(7).encode_i16(true), -7);
    assert_eq!(AssetRef::Master(32_767).encode_i16(false), 32_767);
    assert_eq!(AssetRef::Local(40_000).encode_i16(false), 0);
    assert_eq!(AssetRef::Local(40_000).encode_i16(true), 0);
}

#[test]
fn configuration_filters_used_in() {
    let g = graph(indoc! {r#"
        { "pages": [
            { "name": "a", "usedIn": ["x"] },
            { "name": "b" }
        ] }
    "#});
    let mut diag = Diagnostics::new();

    let filtered = AssetIndex::new(&g, BuildMode::BuildAssets, Some("y"), &mut diag);
    assert_eq!(page_names(&g, &filtered), ["b"]);

    let selected = AssetIndex::new(&g, BuildMode::BuildAssets, Some("x"), &mut diag);
    assert_eq!(page_names(&g, &selected), ["a", "b"]);

    let unfiltered = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);
    assert_eq!(page_names(&g, &unfiltered), ["a", "b"]);
}

const VARIABLES: &str = indoc! {r#"
    { "variables": [
        { "name": "n1", "type": "integer", "native": true },
        { "name": "g", "type": "integer" },
        { "name": "n2", "type": "integer", "native": true, "id": 1 }
    ] }
"#};

#[test]
fn unided_native_variables_are_non_native_outside_build_files() {
    let g = graph(VARIABLES);
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert_eq!(variable_names(&g, &index), ["n1", "g", "n2"]);
    let native: Vec<_> = index
        .native_variables()
        .map(|h| g.get(h).name.as_str())
        .collect();
    assert_eq!(native, ["n2"]);
    assert_eq!(index.variable_position("g"), Some(1));
}

#[test]
fn build_files_mode_partitions_all_native_variables() {
    let g = graph(VARIABLES);
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildFiles, None, &mut diag);

    assert_eq!(variable_names(&g, &index), ["g", "n2", "n1"]);
    let native: Vec<_> = index
        .native_variables()
        .map(|h| g.get(h).name.as_str())
        .collect();
    assert_eq!(native, ["n2", "n1"]);
}

#[test]
fn native_action_positions_count_from_partition_start() {
    let g = graph(indoc! {r#"
        { "actions": [
            { "name": "flowAction", "implementationType": "flow" },
            { "name": "first", "id": 1 },
            { "name": "second", "id": 2 }
        ] }
    "#});
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert_eq!(index.native_action_position("first"), Some(1));
    assert_eq!(index.native_action_position("second"), Some(2));
    assert_eq!(index.native_action_position("flowAction"), None);
    assert_eq!(index.flows().len(), 1);
}

#[test]
fn unknown_references_are_errors() {
    let g = graph(r#"{ "variables": [{ "name": "known", "type": "integer" }] }"#);
    let mut diag = Diagnostics::new();
    let mut index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);
    let source = SourceRef::new("pages/Main");

    let root = g.root();
    assert_eq!(
        index.variable_ref(root, "known", &mut diag, &source),
        AssetRef::Local(1)
    );
    assert_eq!(
        index.variable_ref(root, "nope", &mut diag, &source),
        AssetRef::Unresolved
    );
    assert_eq!(
        index.variable_ref(root, "", &mut diag, &source),
        AssetRef::Unresolved
    );
    assert_eq!(
        messages(&diag, DiagnosticKind::AssetNotFound),
        ["global variable `nope` not found"]
    );
    assert!(diag.has_errors());
}

fn layered() -> ProjectGraph {
    let mut builder = ProjectGraph::builder();
    let root = builder
        .add_json("root", r#"{ "pages": [{ "name": "local" }] }"#)
        .expect("valid root");
    let master = builder
        .add_json(
            "master",
            r#"{ "pages": [{ "name": "shared", "id": 5 }, { "name": "anon" }] }"#,
        )
        .expect("valid master");
    builder.master(master);
    builder.build(root)
}

#[test]
fn layered_builds_negate_local_and_keep_master_ids() {
    let g = layered();
    let mut diag = Diagnostics::new();
    let mut index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);
    let source = SourceRef::new("pages/local");
    let root = g.root();

    assert!(index.is_layered());
    let local = index.page_ref(root, "local", &mut diag, &source);
    assert_eq!(local, AssetRef::Local(1));
    assert_eq!(local.encode(true), -1);

    let shared = index.page_ref(root, "shared", &mut diag, &source);
    assert_eq!(shared, AssetRef::Master(5));
    assert_eq!(shared.encode(true), 5);
    assert_eq!(index.pages.len(), 1);
}

#[test]
fn master_assets_without_id_cannot_be_used() {
    let g = layered();
    let mut diag = Diagnostics::new();
    let mut index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);
    let source = SourceRef::new("pages/local");

    let anon = index.page_ref(g.root(), "anon", &mut diag, &source);
    assert_eq!(anon, AssetRef::Unresolved);
    assert_eq!(
        messages(&diag, DiagnosticKind::MasterAssetWithoutId),
        ["master project page without ID can not be used"]
    );
    assert!(!diag.has_errors());
}

#[test]
fn unused_styles_fonts_and_bitmaps_are_reported() {
    let g = graph(indoc! {r##"
        {
            "styles": [
                { "name": "base", "color": "#ffffff" },
                { "name": "child", "inheritFrom": "base", "backgroundColor": "#000000" },
                { "name": "lonely", "color": "#123456" }
            ],
            "fonts": [{ "name": "small" }],
            "bitmaps": [{ "name": "logo", "alwaysBuild": true }]
        }
    "##});
    let mut diag = Diagnostics::new();
    let mut index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);
    let source = SourceRef::new("pages/Main");

    index.named_style_ref(g.root(), "child", &mut diag, &source);
    index.report_unused(&mut diag);

    assert_eq!(
        messages(&diag, DiagnosticKind::UnusedAsset),
        ["Unused style: lonely", "Unused font: small"]
    );
}

#[test]
fn dashboard_projects_skip_styles() {
    let g = graph(indoc! {r#"
        {
            "settings": { "general": { "projectType": "dashboard" } },
            "styles": [{ "name": "s", "id": 1 }],
            "fonts": [{ "name": "f", "id": 1 }]
        }
    "#});
    let mut diag = Diagnostics::new();
    let index = AssetIndex::new(&g, BuildMode::BuildAssets, None, &mut diag);

    assert!(index.styles.is_empty());
    assert!(index.fonts.is_empty());
}
