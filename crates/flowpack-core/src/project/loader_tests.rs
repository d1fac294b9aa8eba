use std::fs;

use super::*;

#[test]
fn load_follows_imports_and_master() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("app.json");
    fs::write(
        &root,
        r#"{ "settings": { "general": {
              "imports": [{ "projectFilePath": "lib/widgets.json" }],
              "masterProject": "fw.json" } } }"#,
    )
    .unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(
        dir.path().join("lib/widgets.json"),
        r#"{ "settings": { "general": { "imports": [{ "projectFilePath": "../app.json" }] } },
             "styles": [{ "name": "shared" }] }"#,
    )
    .unwrap();
    fs::write(dir.path().join("fw.json"), r#"{ "styles": [{ "name": "fw", "id": 1 }] }"#).unwrap();

    let graph = ProjectGraph::load(&root).unwrap();

    assert_eq!(graph.root_project().name, "app");
    assert_eq!(graph.projects().count(), 3);

    let lib = graph.root_project().imports[0];
    assert_eq!(graph.project(lib).name, "widgets");
    // circular import resolves to the already loaded root
    assert_eq!(graph.project(lib).imports, vec![graph.root()]);

    let master = graph.master_project().unwrap();
    assert_eq!(master.name, "fw");
    assert!(graph.find::<Style>(graph.master().unwrap(), "fw").is_some());
}

#[test]
fn missing_import_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("app.json");
    fs::write(
        &root,
        r#"{ "settings": { "general": { "imports": [{ "projectFilePath": "nope.json" }] } } }"#,
    )
    .unwrap();

    let err = ProjectGraph::load(&root).unwrap_err();

    assert!(matches!(err, ProjectError::Io { .. }));
}

#[test]
fn builder_assembles_graph() {
    let mut builder = ProjectGraph::builder();
    let root = builder.add_json("root", "{}").unwrap();
    let lib = builder.add_json("lib", r#"{ "pages": [{ "name": "P" }] }"#).unwrap();
    builder.import(root, lib).import(root, lib);

    let graph = builder.build(root);

    assert_eq!(graph.root_project().imports, vec![lib]);
    let page = graph.find::<Page>(lib, "P").unwrap();
    assert_eq!(graph.flow_path(FlowRef::Page(page)), "pages/P");
}
