use std::collections::HashMap;

use flowpack_format::{Opcode, Operation};

use super::{EmptyScope, ExprError, Operand, Scope, compile, undefined_instructions};
use crate::constant_pool::{ConstantPool, FlowValue};

struct MapScope(HashMap<&'static str, Operand>);

impl Scope for MapScope {
    fn resolve(&mut self, name: &str) -> Option<Operand> {
        self.0.get(name).copied()
    }
}

fn scope() -> MapScope {
    MapScope(HashMap::from([
        ("input", Operand::Input(1)),
        ("local", Operand::LocalVariable(0)),
        ("global", Operand::GlobalVariable(2)),
        ("far", Operand::GlobalVariable(9000)),
    ]))
}

fn op(operation: Operation) -> u16 {
    Opcode::Operation.encode(operation.code()).unwrap()
}

const END: u16 = 6 << 13;

#[test]
fn empty_text_is_undefined() {
    let mut constants = ConstantPool::new();
    let code = compile("  ", &mut EmptyScope, &mut constants).unwrap();
    assert_eq!(code, undefined_instructions());
    assert_eq!(code, vec![0x0000, END]);
    assert_eq!(constants.len(), 2);
}

#[test]
fn literal_is_pooled() {
    let mut constants = ConstantPool::new();
    let code = compile("42", &mut EmptyScope, &mut constants).unwrap();
    assert_eq!(code, vec![0x0002, END]);
    assert_eq!(constants.get(2), Some(&FlowValue::Integer(42)));

    let again = compile("42", &mut EmptyScope, &mut constants).unwrap();
    assert_eq!(again, code);
}

#[test]
fn null_and_undefined_use_sentinel_slots() {
    let mut constants = ConstantPool::new();
    assert_eq!(
        compile("null", &mut EmptyScope, &mut constants).unwrap(),
        vec![0x0001, END]
    );
    assert_eq!(
        compile("undefined", &mut EmptyScope, &mut constants).unwrap(),
        vec![0x0000, END]
    );
}

#[test]
fn identifiers_by_kind() {
    let mut constants = ConstantPool::new();
    let code = compile("input + local * global", &mut scope(), &mut constants).unwrap();
    assert_eq!(
        code,
        vec![
            0x2001, // PUSH_INPUT 1
            0x4000, // PUSH_LOCAL_VAR 0
            0x6002, // PUSH_GLOBAL_VAR 2
            op(Operation::Mul),
            op(Operation::Add),
            END,
        ]
    );
}

#[test]
fn negative_literal_is_folded() {
    let mut constants = ConstantPool::new();
    let code = compile("-3", &mut EmptyScope, &mut constants).unwrap();
    assert_eq!(code, vec![0x0002, END]);
    assert_eq!(constants.get(2), Some(&FlowValue::Integer(-3)));
}

#[test]
fn unary_on_identifier_is_an_operation() {
    let mut constants = ConstantPool::new();
    let code = compile("!input", &mut scope(), &mut constants).unwrap();
    assert_eq!(code, vec![0x2001, op(Operation::Not), END]);
}

#[test]
fn conditional_pushes_three_operands() {
    let mut constants = ConstantPool::new();
    let code = compile(r#"global ? "on" : "off""#, &mut scope(), &mut constants).unwrap();
    assert_eq!(
        code,
        vec![0x6002, 0x0002, 0x0003, op(Operation::Conditional), END]
    );
}

#[test]
fn unknown_identifier() {
    let mut constants = ConstantPool::new();
    let err = compile("input + missing", &mut scope(), &mut constants).unwrap_err();
    assert_eq!(
        err,
        ExprError::UnknownIdentifier {
            name: "missing".into(),
            span: 8..15,
        }
    );
    assert_eq!(err.to_string(), "unknown identifier `missing`");
}

#[test]
fn operand_overflow() {
    let mut constants = ConstantPool::new();
    let err = compile("far", &mut scope(), &mut constants).unwrap_err();
    assert!(matches!(err, ExprError::OperandOverflow { value: 9000, .. }));
}

#[test]
fn parse_errors_carry_span() {
    let mut constants = ConstantPool::new();
    let err = compile("1 +", &mut EmptyScope, &mut constants).unwrap_err();
    assert!(matches!(err, ExprError::Parse(_)));
    assert_eq!(err.span(), 3..3);
}
