//! Lowering parsed expressions to postfix instructions.

use std::ops::Range;

use flowpack_format::{Opcode, Operation};

use super::parser::{Expr, ExprKind, ParseError, parse};
use crate::constant_pool::ConstantPool;

/// What an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Input(usize),
    LocalVariable(usize),
    GlobalVariable(usize),
}

/// Name resolution for identifiers in one property.
pub trait Scope {
    fn resolve(&mut self, name: &str) -> Option<Operand>;
}

/// Scope with nothing in it; every identifier is unknown.
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn resolve(&mut self, _name: &str) -> Option<Operand> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExprError {
    #[error("{}", .0.message)]
    Parse(#[from] ParseError),
    #[error("unknown identifier `{name}`")]
    UnknownIdentifier { name: String, span: Range<usize> },
    #[error("operand {value} does not fit in 13 bits")]
    OperandOverflow { value: usize, span: Range<usize> },
}

impl ExprError {
    pub fn span(&self) -> Range<usize> {
        match self {
            Self::Parse(e) => e.span.clone(),
            Self::UnknownIdentifier { span, .. } | Self::OperandOverflow { span, .. } => {
                span.clone()
            }
        }
    }
}

/// Instructions of an empty property: push `undefined`, end.
pub fn undefined_instructions() -> Vec<u16> {
    vec![Opcode::PushConstant as u16, (Opcode::End as u16) << 13]
}

/// Parse and lower `text`, terminated by END.
///
/// Empty texts evaluate to `undefined`.
pub fn compile(
    text: &str,
    scope: &mut impl Scope,
    constants: &mut ConstantPool,
) -> Result<Vec<u16>, ExprError> {
    if text.trim().is_empty() {
        return Ok(undefined_instructions());
    }
    let expr = parse(text)?;
    let mut out = Vec::new();
    lower(&expr, scope, constants, &mut out)?;
    push(&mut out, Opcode::End, 0, &expr.span)?;
    Ok(out)
}

pub fn lower(
    expr: &Expr<'_>,
    scope: &mut impl Scope,
    constants: &mut ConstantPool,
    out: &mut Vec<u16>,
) -> Result<(), ExprError> {
    if let ExprKind::Unary(..) = &expr.kind
        && let Some(value) = expr.literal()
    {
        let slot = constants.intern(value);
        return push(out, Opcode::PushConstant, slot as usize, &expr.span);
    }

    match &expr.kind {
        ExprKind::Literal(value) => {
            let slot = constants.intern(value.clone());
            push(out, Opcode::PushConstant, slot as usize, &expr.span)
        }
        ExprKind::Ident(name) => {
            let (opcode, index) = match scope.resolve(name) {
                Some(Operand::Input(i)) => (Opcode::PushInput, i),
                Some(Operand::LocalVariable(i)) => (Opcode::PushLocalVar, i),
                Some(Operand::GlobalVariable(i)) => (Opcode::PushGlobalVar, i),
                None => {
                    return Err(ExprError::UnknownIdentifier {
                        name: name.to_string(),
                        span: expr.span.clone(),
                    });
                }
            };
            push(out, opcode, index, &expr.span)
        }
        ExprKind::Unary(operation, operand) => {
            lower(operand, scope, constants, out)?;
            push_operation(out, *operation, &expr.span)
        }
        ExprKind::Binary(operation, lhs, rhs) => {
            lower(lhs, scope, constants, out)?;
            lower(rhs, scope, constants, out)?;
            push_operation(out, *operation, &expr.span)
        }
        ExprKind::Conditional(condition, then, otherwise) => {
            lower(condition, scope, constants, out)?;
            lower(then, scope, constants, out)?;
            lower(otherwise, scope, constants, out)?;
            push_operation(out, Operation::Conditional, &expr.span)
        }
    }
}

fn push_operation(
    out: &mut Vec<u16>,
    operation: Operation,
    span: &Range<usize>,
) -> Result<(), ExprError> {
    push(out, Opcode::Operation, operation.code() as usize, span)
}

fn push(
    out: &mut Vec<u16>,
    opcode: Opcode,
    operand: usize,
    span: &Range<usize>,
) -> Result<(), ExprError> {
    let instruction = u16::try_from(operand)
        .ok()
        .and_then(|o| opcode.encode(o))
        .ok_or_else(|| ExprError::OperandOverflow {
            value: operand,
            span: span.clone(),
        })?;
    out.push(instruction);
    Ok(())
}
