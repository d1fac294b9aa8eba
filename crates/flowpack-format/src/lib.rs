//! On-wire asset format for flowpack.
//!
//! This crate contains:
//! - Format constants (magic, versions, widget/component/value type codes, opcodes)
//! - The 12-byte blob [`Header`]
//! - [`DataBuffer`], a little-endian writer with deferred object offsets
//! - LZ4 block compression and a human-readable [`dump`]

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compress;
pub mod constants;
pub mod data_buffer;
pub mod dump;
mod error;
pub mod header;

#[cfg(test)]
mod compress_tests;
#[cfg(test)]
mod data_buffer_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod header_tests;

pub use compress::{compress, decompress, pack, unpack};
pub use constants::{
    FIRST_DASHBOARD_COMPONENT_TYPE, HEADER_SIZE, LVGL_WIDGET_COMPONENT_TYPE, MAGIC,
    MAJOR_VERSION, MINOR_VERSION, OPERAND_MAX, Opcode, Operation, TRANSPARENT_COLOR,
    UNREGISTERED_ITEM, ValueTypeCode,
};
pub use data_buffer::{DataBuffer, TextEncoding};
pub use dump::{dump, dump_payload};
pub use error::FormatError;
pub use header::Header;
