use indoc::indoc;

use crate::Error;
use crate::build::{BuildMode, BuildOptions};
use crate::templates::{expand_file_name, markers, render, render_build_files};
use crate::test_utils::graph;

#[test]
fn markers_name_a_section_and_maybe_a_configuration() {
    let template = "a //${eez-studio GUI_PAGES_ENUM} b //${eez-studio FLOW_DEFS release} //${eez-studio";
    let found = markers(template);

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].section, "GUI_PAGES_ENUM");
    assert_eq!(found[0].configuration, None);
    assert_eq!(&template[found[0].range.clone()], "//${eez-studio GUI_PAGES_ENUM}");
    assert_eq!(found[1].section, "FLOW_DEFS");
    assert_eq!(found[1].configuration, Some("release"));
}

#[test]
fn render_replaces_markers_in_place() {
    let out = render(
        "x\n//${eez-studio GUI_FONTS_ENUM}\ny //${eez-studio FLOW_DEFS debug}\n",
        |section, configuration| Ok(format!("[{section} {}]", configuration.unwrap_or("-"))),
    )
    .expect("rendered");

    assert_eq!(out, "x\n[GUI_FONTS_ENUM -]\ny [FLOW_DEFS debug]\n");
}

#[test]
fn render_rejects_unknown_sections() {
    let err = render("//${eez-studio NOPE}", |_, _| Ok(String::new())).unwrap_err();
    assert!(matches!(err, Error::InvalidSection(name) if name == "NOPE"));
}

#[test]
fn configuration_placeholder_expands_per_configuration() {
    let configurations = ["debug".to_string(), "release".to_string()];

    assert_eq!(
        expand_file_name("gui_<configuration>.h", &configurations),
        [
            ("gui_debug.h".to_string(), Some("debug".to_string())),
            ("gui_release.h".to_string(), Some("release".to_string())),
        ]
    );
    assert_eq!(
        expand_file_name("gui.h", &configurations),
        [("gui.h".to_string(), None)]
    );
}

#[test]
fn build_files_use_their_configuration() {
    let g = graph(indoc! {r#"
        {
          "settings": {
            "build": {
              "configurations": [{ "name": "debug" }, { "name": "release" }],
              "files": [
                { "fileName": "pages_<configuration>.h",
                  "template": "// pages\n//${eez-studio GUI_PAGES_ENUM}\n" }
              ]
            }
          },
          "pages": [
            { "name": "Main" },
            { "name": "Trace", "usedIn": ["debug"] }
          ]
        }
    "#});

    let (files, _) =
        render_build_files(&g, &BuildOptions::new(BuildMode::BuildFiles)).expect("rendered");

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].file_name, "pages_debug.h");
    assert_eq!(
        files[0].contents,
        "// pages\nenum PagesEnum {\n\tPAGE_ID_NONE = 0,\n\tPAGE_ID_MAIN = 1,\n\tPAGE_ID_TRACE = 2\n};\n"
    );
    assert_eq!(files[1].file_name, "pages_release.h");
    assert_eq!(
        files[1].contents,
        "// pages\nenum PagesEnum {\n\tPAGE_ID_NONE = 0,\n\tPAGE_ID_MAIN = 1\n};\n"
    );
}
