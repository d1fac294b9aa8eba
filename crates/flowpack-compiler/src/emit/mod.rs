//! Emission backends over the resolved model.
//!
//! - [`BinaryWriter`] serializes the assets blob payload.
//! - [`EnumSections`] renders the C enum sections, and [`blob_sections`]
//!   wraps a packed blob as declaration/definition text.
//! - [`LvglSections`] generates LVGL screen, event and tick source.

mod binary;
pub mod lvgl;
mod text;
mod visitor;

#[cfg(test)]
mod text_tests;

pub use binary::BinaryWriter;
pub use lvgl::LvglSections;
pub use text::{EnumSections, blob_sections};
pub use visitor::{ModelVisitor, walk_flows, walk_model, walk_page, walk_pages, walk_widget};
