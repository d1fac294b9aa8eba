use crate::value_type::ValueType;

#[test]
fn parse_scalars() {
    assert_eq!(ValueType::parse("integer"), ValueType::Integer);
    assert_eq!(ValueType::parse("boolean"), ValueType::Boolean);
    assert_eq!(ValueType::parse("whatever"), ValueType::Any);
}

#[test]
fn parse_compound() {
    assert_eq!(
        ValueType::parse("array:enum:Mode"),
        ValueType::Array(Box::new(ValueType::Enum("Mode".into())))
    );
    assert_eq!(
        ValueType::parse("struct:Point"),
        ValueType::Struct("Point".into())
    );
}

#[test]
fn display_roundtrips_names() {
    for name in ["integer", "string", "enum:Mode", "array:struct:Point"] {
        assert_eq!(ValueType::parse(name).to_string(), name);
    }
}
