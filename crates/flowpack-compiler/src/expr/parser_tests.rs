use flowpack_format::Operation;

use super::{ExprKind, literal_value, parse};
use crate::constant_pool::FlowValue;

/// Render a parsed expression as a fully parenthesized S-expression.
fn sexp(text: &str) -> String {
    fn go(expr: &super::Expr<'_>) -> String {
        match &expr.kind {
            ExprKind::Literal(value) => format!("{value:?}"),
            ExprKind::Ident(name) => name.to_string(),
            ExprKind::Unary(op, inner) => format!("({op:?} {})", go(inner)),
            ExprKind::Binary(op, lhs, rhs) => format!("({op:?} {} {})", go(lhs), go(rhs)),
            ExprKind::Conditional(c, t, e) => format!("(? {} {} {})", go(c), go(t), go(e)),
        }
    }
    go(&parse(text).unwrap())
}

#[test]
fn literals() {
    assert_eq!(sexp("42"), "Integer(42)");
    assert_eq!(sexp("0x1F"), "Integer(31)");
    assert_eq!(sexp("1.5"), "Double(1.5)");
    assert_eq!(sexp("true"), "Boolean(true)");
    assert_eq!(sexp("null"), "Null");
    assert_eq!(sexp("undefined"), "Undefined");
    assert_eq!(sexp(r#""a\"b""#), r#"String("a\"b")"#);
    assert_eq!(sexp("'it'"), r#"String("it")"#);
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(sexp("trueish"), "trueish");
    assert_eq!(sexp("true"), "Boolean(true)");
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(sexp("a + b * c"), "(Add a (Mul b c))");
    assert_eq!(sexp("(a + b) * c"), "(Mul (Add a b) c)");
}

#[test]
fn binary_operators_are_left_associative() {
    assert_eq!(sexp("a - b - c"), "(Sub (Sub a b) c)");
}

#[test]
fn logical_and_comparison_levels() {
    assert_eq!(
        sexp("a < 1 || b == 2 && c"),
        "(LogicalOr (Less a Integer(1)) (LogicalAnd (Equal b Integer(2)) c))"
    );
    assert_eq!(sexp("a | b ^ c & d"), "(BinaryOr a (BinaryXor b (BinaryAnd c d)))");
    assert_eq!(sexp("a << 1 + 2"), "(LeftShift a (Add Integer(1) Integer(2)))");
}

#[test]
fn unary_operators() {
    assert_eq!(sexp("!a"), "(Not a)");
    assert_eq!(sexp("-a * b"), "(Mul (UnaryMinus a) b)");
    assert_eq!(sexp("~~a"), "(BinaryInvert (BinaryInvert a))");
}

#[test]
fn conditional_is_right_associative() {
    assert_eq!(sexp("a ? b : c ? d : e"), "(? a b (? c d e))");
    assert_eq!(sexp("a || b ? 1 : 2"), "(? (LogicalOr a b) Integer(1) Integer(2))");
}

#[test]
fn spans_cover_operands() {
    let expr = parse("count + 1").unwrap();
    assert_eq!(expr.span, 0..9);
    let ExprKind::Binary(op, lhs, _) = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, Operation::Add);
    assert_eq!(lhs.span, 0..5);
}

#[test]
fn errors() {
    let err = parse("a +").unwrap_err();
    assert_eq!(err.message, "expected expression, got end of input");
    assert_eq!(err.span, 3..3);

    let err = parse("a b").unwrap_err();
    assert_eq!(err.span, 2..3);

    let err = parse("a # b").unwrap_err();
    assert_eq!(err.message, r##"unexpected character: "#""##);

    assert!(parse("(a").is_err());
    assert!(parse("a ? b").is_err());
    assert!(parse("99999999999999999999").is_err());
}

#[test]
fn literal_values() {
    assert_eq!(literal_value("").unwrap(), Some(FlowValue::Undefined));
    assert_eq!(literal_value("-5").unwrap(), Some(FlowValue::Integer(-5)));
    assert_eq!(literal_value("+2.5").unwrap(), Some(FlowValue::Double(2.5)));
    assert_eq!(
        literal_value(r#""hello""#).unwrap(),
        Some(FlowValue::String("hello".into()))
    );
    assert_eq!(literal_value("a + 1").unwrap(), None);
    assert_eq!(literal_value("-true").unwrap(), None);
    assert!(literal_value("+").is_err());
}
