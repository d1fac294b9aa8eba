#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for flowpack.
//!
//! - [`project`]: the project graph the compiler reads (pages, flows, assets,
//!   imports, master project)
//! - [`interner`]: symbols for composite `(component, name)` keys
//! - [`utils`]: C identifier naming
//! - [`colors`]: terminal palette shared by the CLI renderers

pub mod colors;
pub mod interner;
pub mod project;
pub mod utils;
pub mod value_type;

#[cfg(test)]
mod utils_tests;
#[cfg(test)]
mod value_type_tests;

pub use colors::Colors;
pub use interner::{Interner, Symbol};
pub use project::{FlowRef, Handle, ProjectGraph, ProjectId};
pub use value_type::ValueType;
