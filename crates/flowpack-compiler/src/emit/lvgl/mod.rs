//! LVGL source backend.
//!
//! Generates screen construction and tick functions, event callbacks and
//! the declarations native code links against. Event callbacks carry the
//! same `(component, output)` pairs the binary flow definition holds.

mod decls;
mod identifiers;
mod screens;
mod source;


use flowpack_core::utils::to_lower_snake_case;

use crate::build::SectionName;
use crate::diagnostics::Diagnostics;
use crate::model::{ActionRecord, BitmapRecord, FontRecord, ResolvedModel, ResolvedPage, VariableRecord};

use super::visitor::ModelVisitor;
use identifiers::ObjectTable;

pub struct LvglSections<'m> {
    model: &'m ResolvedModel,
    objects: ObjectTable,
    sections: Vec<(SectionName, String)>,
}

impl<'m> LvglSections<'m> {
    /// Lay out `objects_t`; duplicate widget names are reported to `diag`.
    pub fn new(model: &'m ResolvedModel, diag: &mut Diagnostics) -> Self {
        Self {
            model,
            objects: ObjectTable::build(model, diag),
            sections: Vec::new(),
        }
    }

    pub fn into_sections(self) -> Vec<(SectionName, String)> {
        self.sections
    }

    /// `objects_t` fields in declaration order.
    pub fn object_fields(&self) -> &[String] {
        &self.objects.fields
    }

    fn flow_support(&self) -> bool {
        self.model.flow_support
    }

    /// Real pages with their slot index.
    fn pages(&self) -> impl Iterator<Item = (usize, &'m ResolvedPage)> {
        self.model
            .pages
            .iter()
            .enumerate()
            .filter(|(_, page)| !page.filler)
    }
}

impl<'m> ModelVisitor<'m> for LvglSections<'m> {
    fn visit_pages(&mut self, _pages: &'m [ResolvedPage]) {
        let sections = [
            (SectionName::LvglScreensDecl, self.screens_decl()),
            (SectionName::LvglScreensDef, self.screens_def()),
            (SectionName::LvglScreensDeclExt, self.screens_decl_ext()),
            (SectionName::LvglScreensDefExt, self.screens_def_ext()),
        ];
        self.sections.extend(sections);
    }

    fn visit_fonts(&mut self, fonts: &'m [FontRecord]) {
        let text = decls::fonts_decl(fonts);
        self.sections.push((SectionName::LvglFontsDecl, text));
    }

    fn visit_bitmaps(&mut self, bitmaps: &'m [BitmapRecord]) {
        self.sections
            .push((SectionName::LvglImagesDecl, decls::images_decl(bitmaps)));
        self.sections
            .push((SectionName::LvglImagesDef, decls::images_def(bitmaps)));
    }

    fn visit_actions(&mut self, actions: &'m [ActionRecord]) {
        let text = decls::actions_decl(actions, self.flow_support());
        self.sections.push((SectionName::LvglActionsDecl, text));
    }

    fn visit_variables(&mut self, variables: &'m [VariableRecord]) {
        let flow_support = self.flow_support();
        self.sections.push((
            SectionName::LvglVarsDecl,
            decls::vars_decl(variables, flow_support),
        ));
        self.sections.push((
            SectionName::LvglNativeVarsTableDef,
            decls::native_vars_table_def(variables, flow_support),
        ));
    }
}

fn action_function(name: &str) -> String {
    format!("action_{}", to_lower_snake_case(name))
}

fn getter_function(name: &str) -> String {
    format!("get_var_{}", to_lower_snake_case(name))
}

fn setter_function(name: &str) -> String {
    format!("set_var_{}", to_lower_snake_case(name))
}

fn image_variable(name: &str) -> String {
    format!("img_{}", to_lower_snake_case(name))
}

fn font_variable(name: &str) -> String {
    format!("ui_font_{}", to_lower_snake_case(name))
}
