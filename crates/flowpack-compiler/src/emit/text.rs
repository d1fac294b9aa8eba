//! C text sections: asset enums, flow definitions and the blob as a byte array.

use std::fmt::Write;

use flowpack_core::utils::{to_pascal_case, to_upper_snake_case};

use crate::build::{SectionName, SectionOutput};
use crate::model::{
    BitmapRecord, ColorsRecord, FontRecord, ResolvedFlow, ResolvedModel, ResolvedPage,
    StyleRecord,
};

use super::visitor::{ModelVisitor, walk_flows};

/// Collects the `GUI_*_ENUM` and `FLOW_DEFS` sections.
#[derive(Debug, Default)]
pub struct EnumSections {
    sections: Vec<(SectionName, String)>,
    flows: Vec<(String, usize)>,
    flow_components: Vec<String>,
}

impl EnumSections {
    pub fn into_sections(self) -> Vec<(SectionName, String)> {
        self.sections
    }

    /// Slot enum with a leading `NONE = 0`; back-filled slots are skipped.
    fn push_slots<'a>(
        &mut self,
        section: SectionName,
        enum_name: &str,
        prefix: &str,
        slots: impl Iterator<Item = (&'a str, bool)>,
    ) {
        let mut members = vec![(format!("{prefix}NONE"), 0)];
        for (i, (name, filler)) in slots.enumerate() {
            if !filler {
                members.push((format!("{prefix}{}", to_upper_snake_case(name)), i + 1));
            }
        }
        self.sections
            .push((section, render_enum(enum_name, &members)));
    }
}

impl<'m> ModelVisitor<'m> for EnumSections {
    fn visit_pages(&mut self, pages: &'m [ResolvedPage]) {
        self.push_slots(
            SectionName::PagesEnum,
            "PagesEnum",
            "PAGE_ID_",
            pages.iter().map(|p| (p.name.as_str(), p.filler)),
        );
    }

    fn visit_styles(&mut self, styles: &'m [StyleRecord]) {
        self.push_slots(
            SectionName::StylesEnum,
            "StylesEnum",
            "STYLE_ID_",
            styles.iter().map(|s| (s.name.as_str(), s.filler)),
        );
    }

    fn visit_fonts(&mut self, fonts: &'m [FontRecord]) {
        self.push_slots(
            SectionName::FontsEnum,
            "FontsEnum",
            "FONT_ID_",
            fonts.iter().map(|f| (f.name.as_str(), f.filler)),
        );
    }

    fn visit_bitmaps(&mut self, bitmaps: &'m [BitmapRecord]) {
        self.push_slots(
            SectionName::BitmapsEnum,
            "BitmapsEnum",
            "BITMAP_ID_",
            bitmaps.iter().map(|b| (b.name.as_str(), b.filler)),
        );
    }

    fn visit_colors(&mut self, colors: &'m ColorsRecord) {
        let themes: Vec<_> = colors
            .themes
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("THEME_ID_{}", to_upper_snake_case(&t.name)), i))
            .collect();
        self.sections
            .push((SectionName::ThemesEnum, render_enum("ThemesEnum", &themes)));

        let names: Vec<_> = colors
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (format!("COLOR_ID_{}", to_upper_snake_case(n)), i))
            .collect();
        self.sections
            .push((SectionName::ColorsEnum, render_enum("ColorsEnum", &names)));
    }

    fn visit_flows(&mut self, model: &'m ResolvedModel) {
        walk_flows(self, model);

        let mut text = render_enum("FlowsEnum", &self.flows);
        for components in self.flow_components.drain(..) {
            text.push_str("\n\n");
            text.push_str(&components);
        }
        self.sections.push((SectionName::FlowDefs, text));
    }

    fn visit_flow(&mut self, flow: &'m ResolvedFlow) {
        let flow_name = to_upper_snake_case(&flow.name);
        self.flows
            .push((format!("FLOW_ID_{flow_name}"), flow.flow_index as usize));

        let members: Vec<_> = flow
            .components
            .iter()
            .enumerate()
            .filter_map(|(i, c)| {
                let ident = c.identifier.as_deref()?;
                Some((
                    format!("COMPONENT_ID_{flow_name}_{}", to_upper_snake_case(ident)),
                    i,
                ))
            })
            .collect();
        if !members.is_empty() {
            let enum_name = format!("{}ComponentsEnum", to_pascal_case(&flow.name));
            self.flow_components.push(render_enum(&enum_name, &members));
        }
    }
}

/// `enum Name {` with one tab-indented member per line.
fn render_enum(name: &str, members: &[(String, usize)]) -> String {
    let body: Vec<_> = members
        .iter()
        .map(|(member, value)| format!("\t{member} = {value}"))
        .collect();
    if body.is_empty() {
        return format!("enum {name} {{\n}};");
    }
    format!("enum {name} {{\n{}\n}};", body.join(",\n"))
}

/// Declaration, definition and raw data sections of a packed blob.
pub fn blob_sections(blob: &[u8]) -> Vec<(SectionName, SectionOutput)> {
    let decl = format!("extern const uint8_t assets[{}];", blob.len());
    let def = format!(
        "// ASSETS DEFINITION\nconst uint8_t assets[{}] = {{{}}};",
        blob.len(),
        dump_bytes(blob)
    );
    vec![
        (SectionName::AssetsDecl, SectionOutput::Text(decl.clone())),
        (SectionName::AssetsDeclCompressed, SectionOutput::Text(decl)),
        (SectionName::AssetsDef, SectionOutput::Text(def.clone())),
        (SectionName::AssetsDefCompressed, SectionOutput::Text(def)),
        (SectionName::AssetsData, SectionOutput::Binary(blob.to_vec())),
    ]
}

/// `0x..` literals, 16 per tab-indented line.
fn dump_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 6 + 8);
    for (i, byte) in bytes.iter().enumerate() {
        if i % 16 == 0 {
            out.push_str("\n\t");
        } else {
            out.push(' ');
        }
        let _ = write!(out, "0x{byte:02x}");
        if i + 1 < bytes.len() {
            out.push(',');
        }
    }
    if !bytes.is_empty() {
        out.push('\n');
    }
    out
}
