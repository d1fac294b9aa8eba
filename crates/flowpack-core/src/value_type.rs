//! Declared value types of variables and flow values.

use std::fmt;

/// Value type as written in project files (`integer`, `enum:Mode`, `array:string`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    Integer,
    Float,
    Double,
    Boolean,
    String,
    Date,
    Blob,
    Stream,
    Json,
    #[default]
    Any,
    Enum(String),
    Struct(String),
    Array(Box<ValueType>),
}

impl ValueType {
    /// Parse a value type string. Unknown names fall back to [`ValueType::Any`].
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(name) = s.strip_prefix("enum:") {
            return Self::Enum(name.to_string());
        }
        if let Some(name) = s.strip_prefix("struct:") {
            return Self::Struct(name.to_string());
        }
        if let Some(element) = s.strip_prefix("array:") {
            return Self::Array(Box::new(Self::parse(element)));
        }
        match s {
            "integer" => Self::Integer,
            "float" => Self::Float,
            "double" => Self::Double,
            "boolean" => Self::Boolean,
            "string" => Self::String,
            "date" => Self::Date,
            "blob" => Self::Blob,
            "stream" => Self::Stream,
            "json" => Self::Json,
            _ => Self::Any,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Boolean => f.write_str("boolean"),
            Self::String => f.write_str("string"),
            Self::Date => f.write_str("date"),
            Self::Blob => f.write_str("blob"),
            Self::Stream => f.write_str("stream"),
            Self::Json => f.write_str("json"),
            Self::Any => f.write_str("any"),
            Self::Enum(name) => write!(f, "enum:{name}"),
            Self::Struct(name) => write!(f, "struct:{name}"),
            Self::Array(element) => write!(f, "array:{element}"),
        }
    }
}
