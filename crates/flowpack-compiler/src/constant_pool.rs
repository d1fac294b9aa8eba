//! Deduplicated flow constants.
//!
//! Slots 0 and 1 always hold `undefined` and `null`; the runtime checks for
//! "no value" by slot number.

use std::collections::HashMap;

use flowpack_core::ValueType;
use flowpack_format::ValueTypeCode;

/// A literal value as stored in the constants table.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowValue {
    Undefined,
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Structured literal, serialized as JSON text.
    Json(serde_json::Value),
}

impl FlowValue {
    /// Type tag written in front of the 8-byte payload.
    pub fn type_code(&self) -> ValueTypeCode {
        match self {
            Self::Undefined => ValueTypeCode::Undefined,
            Self::Null => ValueTypeCode::Null,
            Self::Boolean(_) => ValueTypeCode::Boolean,
            Self::Integer(v) if i32::try_from(*v).is_ok() => ValueTypeCode::Int32,
            Self::Integer(_) => ValueTypeCode::Int64,
            Self::Float(_) => ValueTypeCode::Float,
            Self::Double(_) => ValueTypeCode::Double,
            Self::String(_) => ValueTypeCode::String,
            Self::Json(_) => ValueTypeCode::Json,
        }
    }

    /// Declared value type, for the assets map.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Undefined | Self::Null => ValueType::Any,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::Json(_) => ValueType::Json,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Undefined | Self::Null => serde_json::Value::Null,
            Self::Boolean(v) => (*v).into(),
            Self::Integer(v) => (*v).into(),
            Self::Float(v) => (*v).into(),
            Self::Double(v) => (*v).into(),
            Self::String(v) => v.clone().into(),
            Self::Json(v) => v.clone(),
        }
    }

    /// Coerce a literal to a declared variable type, e.g. `1` into a float variable.
    pub fn coerce(self, value_type: &ValueType) -> Self {
        match (self, value_type) {
            (Self::Integer(v), ValueType::Float) => Self::Float(v as f32),
            (Self::Integer(v), ValueType::Double) => Self::Double(v as f64),
            (Self::Double(v), ValueType::Float) => Self::Float(v as f32),
            (value, _) => value,
        }
    }
}

/// Hashable identity of a scalar constant. Floats compare by bit pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstantKey {
    Undefined,
    Null,
    Boolean(bool),
    Integer(i64),
    Float(u32),
    Double(u64),
    String(String),
}

impl ConstantKey {
    fn of(value: &FlowValue) -> Option<Self> {
        Some(match value {
            FlowValue::Undefined => Self::Undefined,
            FlowValue::Null => Self::Null,
            FlowValue::Boolean(v) => Self::Boolean(*v),
            FlowValue::Integer(v) => Self::Integer(*v),
            FlowValue::Float(v) => Self::Float(v.to_bits()),
            FlowValue::Double(v) => Self::Double(v.to_bits()),
            FlowValue::String(v) => Self::String(v.clone()),
            FlowValue::Json(_) => return None,
        })
    }
}

pub const UNDEFINED_INDEX: u16 = 0;
pub const NULL_INDEX: u16 = 1;

#[derive(Debug, Clone)]
pub struct ConstantPool {
    values: Vec<FlowValue>,
    index: HashMap<ConstantKey, u16>,
}

impl Default for ConstantPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantPool {
    pub fn new() -> Self {
        let mut pool = Self {
            values: Vec::new(),
            index: HashMap::new(),
        };
        pool.intern(FlowValue::Undefined);
        pool.intern(FlowValue::Null);
        pool
    }

    /// Slot of `value`, appending it on first use.
    ///
    /// `Json` values always get a fresh slot.
    pub fn intern(&mut self, value: FlowValue) -> u16 {
        let key = ConstantKey::of(&value);
        if let Some(key) = &key
            && let Some(&slot) = self.index.get(key)
        {
            return slot;
        }
        let slot = self.values.len() as u16;
        self.values.push(value);
        if let Some(key) = key {
            self.index.insert(key, slot);
        }
        slot
    }

    pub fn get(&self, slot: u16) -> Option<&FlowValue> {
        self.values.get(slot as usize)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlowValue> {
        self.values.iter()
    }

    pub fn into_values(self) -> Vec<FlowValue> {
        self.values
    }
}
