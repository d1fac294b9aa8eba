//! Property expressions.
//!
//! Flow-bound widget properties and component properties are small
//! expressions (`counter + 1`, `enabled ? "On" : "Off"`). They are lexed with
//! logos, parsed by precedence climbing and lowered to 16-bit postfix
//! instructions, `opcode << 13 | operand`, terminated by END.
//!
//! Identifiers resolve through a caller-provided [`Scope`]: the owning
//! component's data inputs first, then flow locals, then globals.

mod lexer;
mod lower;
mod parser;

#[cfg(test)]
mod lower_tests;
#[cfg(test)]
mod parser_tests;

pub use lower::{EmptyScope, ExprError, Operand, Scope, compile, lower, undefined_instructions};
pub use parser::{Expr, ExprKind, ParseError, parse};

use crate::constant_pool::FlowValue;

/// Value of a literal expression text; empty text is `undefined`.
///
/// `Ok(None)` means the text parsed but is not a literal.
pub fn literal_value(text: &str) -> Result<Option<FlowValue>, ParseError> {
    if text.trim().is_empty() {
        return Ok(Some(FlowValue::Undefined));
    }
    Ok(parse(text)?.literal())
}
