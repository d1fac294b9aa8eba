//! Resolved model visitor.
//!
//! Every backend walks the same [`ResolvedModel`] in the same section
//! order, so the index pairs the blob carries and the ones generated C
//! source carries always agree.
//!
//! # Usage
//!
//! Implement `ModelVisitor` for your backend and override the `visit_*`
//! methods for the sections it emits. Call the matching `walk_*` inside an
//! override to keep descending (or omit it to stop).
//!
//! ```ignore
//! impl<'m> ModelVisitor<'m> for PageNames {
//!     fn visit_page(&mut self, page: &'m ResolvedPage) {
//!         self.names.push(&page.name);
//!         walk_page(self, page);
//!     }
//! }
//!
//! walk_model(&model, &mut PageNames::default());
//! ```

use crate::model::{
    ActionRecord, BitmapRecord, ColorsRecord, FontRecord, LanguageRecord, ResolvedFlow,
    ResolvedModel, ResolvedPage, ResolvedWidget, StyleRecord, VariableRecord,
};

pub trait ModelVisitor<'m>: Sized {
    fn visit_settings(&mut self, _model: &'m ResolvedModel) {}

    fn visit_pages(&mut self, pages: &'m [ResolvedPage]) {
        walk_pages(self, pages);
    }

    fn visit_page(&mut self, page: &'m ResolvedPage) {
        walk_page(self, page);
    }

    fn visit_widget(&mut self, widget: &'m ResolvedWidget) {
        walk_widget(self, widget);
    }

    fn visit_styles(&mut self, _styles: &'m [StyleRecord]) {}

    fn visit_fonts(&mut self, _fonts: &'m [FontRecord]) {}

    fn visit_bitmaps(&mut self, _bitmaps: &'m [BitmapRecord]) {}

    fn visit_colors(&mut self, _colors: &'m ColorsRecord) {}

    fn visit_actions(&mut self, _actions: &'m [ActionRecord]) {}

    fn visit_variables(&mut self, _variables: &'m [VariableRecord]) {}

    /// The flow definition: flows plus the constants and global defaults
    /// they index into.
    fn visit_flows(&mut self, model: &'m ResolvedModel) {
        walk_flows(self, model);
    }

    fn visit_flow(&mut self, _flow: &'m ResolvedFlow) {}

    fn visit_languages(&mut self, _languages: &'m [LanguageRecord]) {}
}

/// Visit every section in wire order.
pub fn walk_model<'m, V: ModelVisitor<'m>>(model: &'m ResolvedModel, visitor: &mut V) {
    visitor.visit_settings(model);
    visitor.visit_pages(&model.pages);
    visitor.visit_styles(&model.styles);
    visitor.visit_fonts(&model.fonts);
    visitor.visit_bitmaps(&model.bitmaps);
    visitor.visit_colors(&model.colors);
    visitor.visit_actions(&model.actions);
    visitor.visit_variables(&model.variables);
    visitor.visit_flows(model);
    visitor.visit_languages(&model.languages);
}

pub fn walk_pages<'m, V: ModelVisitor<'m>>(visitor: &mut V, pages: &'m [ResolvedPage]) {
    for page in pages {
        visitor.visit_page(page);
    }
}

/// Descend into the page's top-level widgets; the root itself is not visited.
pub fn walk_page<'m, V: ModelVisitor<'m>>(visitor: &mut V, page: &'m ResolvedPage) {
    for child in page.root.children() {
        visitor.visit_widget(child);
    }
}

pub fn walk_widget<'m, V: ModelVisitor<'m>>(visitor: &mut V, widget: &'m ResolvedWidget) {
    for child in widget.children() {
        visitor.visit_widget(child);
    }
}

pub fn walk_flows<'m, V: ModelVisitor<'m>>(visitor: &mut V, model: &'m ResolvedModel) {
    for flow in &model.flows {
        visitor.visit_flow(flow);
    }
}
