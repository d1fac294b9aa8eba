use indexmap::IndexMap;
use indoc::indoc;

use super::{EnumSections, blob_sections, walk_model};
use crate::build::{SectionName, SectionOutput};
use crate::test_utils::resolve_json;

fn enums(json: &str) -> IndexMap<SectionName, String> {
    let (model, _) = resolve_json(json);
    let mut enums = EnumSections::default();
    walk_model(&model, &mut enums);
    enums.into_sections().into_iter().collect()
}

#[test]
fn pages_enum_starts_at_one() {
    let sections = enums(indoc! {r#"
        { "pages": [{ "name": "Main" }, { "name": "Settings page" }] }
    "#});

    insta::assert_snapshot!(sections[&SectionName::PagesEnum], @r"
    enum PagesEnum {
    	PAGE_ID_NONE = 0,
    	PAGE_ID_MAIN = 1,
    	PAGE_ID_SETTINGS_PAGE = 2
    };
    ");
}

#[test]
fn color_enums_are_zero_based() {
    let sections = enums(indoc! {r##"
        {
          "colors": [{ "name": "background" }, { "name": "accent" }],
          "themes": [{ "name": "Light", "colors": ["#ffffff", "#ff0000"] }],
          "pages": [{ "name": "Main" }]
        }
    "##});

    assert_eq!(
        sections[&SectionName::ThemesEnum],
        "enum ThemesEnum {\n\tTHEME_ID_LIGHT = 0\n};"
    );
    assert!(sections[&SectionName::ColorsEnum].starts_with(
        "enum ColorsEnum {\n\tCOLOR_ID_BACKGROUND = 0,\n\tCOLOR_ID_ACCENT = 1"
    ));
}

#[test]
fn flow_defs_list_flows() {
    let sections = enums(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [{ "name": "Main" }]
        }
    "#});

    insta::assert_snapshot!(sections[&SectionName::FlowDefs], @r"
    enum FlowsEnum {
    	FLOW_ID_MAIN = 0
    };
    ");
}

#[test]
fn blob_is_dumped_sixteen_bytes_per_line() {
    let blob: Vec<u8> = (0..17).collect();
    let sections: IndexMap<_, _> = blob_sections(&blob).into_iter().collect();

    assert_eq!(
        sections[&SectionName::AssetsDecl],
        SectionOutput::Text("extern const uint8_t assets[17];".to_string())
    );
    let def = sections[&SectionName::AssetsDef].as_text().expect("text");
    insta::assert_snapshot!(def, @r"
    // ASSETS DEFINITION
    const uint8_t assets[17] = {
    	0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
    	0x10
    };
    ");
    assert_eq!(
        sections[&SectionName::AssetsDefCompressed],
        sections[&SectionName::AssetsDef]
    );
    assert_eq!(
        sections[&SectionName::AssetsData],
        SectionOutput::Binary(blob)
    );
}
