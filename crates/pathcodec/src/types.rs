use std::fmt::Display;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

// === Error types ===

/// Errors that can occur while decoding values from a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The buffer ended in the middle of a value.
    #[error("unexpected end of path data")]
    UnexpectedEof,

    /// The tag byte is not valid for the value being read.
    #[error("invalid tag: 0x{0:02x}")]
    InvalidTag(u8),

    /// The value was well-formed but does not fit the requested type.
    #[error("value out of range")]
    OutOfRange,
}

// === Property identifiers ===

/// Identifies a property within a table.
///
/// Positive ids are object properties, negative ids are action properties
/// and zero is reserved for the built-in fields.
pub type PropertyId = i8;

/// An action identifier. Zero means the event carries no action.
pub type ActionId = u16;

// === Data types ===

/// The declared type of a property value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SerializeDisplay, DeserializeFromStr,
)]
pub enum DataType {
    #[default]
    None,
    String,
    Int,
    Double,
    Boolean,
}

impl DataType {
    /// The value every field of this type holds before it is first set,
    /// and the value action fields are reset to on every event.
    pub fn zero_value(self) -> Value {
        match self {
            DataType::None => Value::None,
            DataType::String => Value::String(String::new()),
            DataType::Int => Value::Int(0),
            DataType::Double => Value::Double(0.0),
            DataType::Boolean => Value::Boolean(false),
        }
    }
}

impl FromStr for DataType {
    type Err = std::convert::Infallible;

    /// Unrecognized names map to `DataType::None` so that properties of
    /// unknown types are still decoded and then discarded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "string" => DataType::String,
            "int" => DataType::Int,
            "double" => DataType::Double,
            "boolean" => DataType::Boolean,
            _ => DataType::None,
        })
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            DataType::None => "",
            DataType::String => "string",
            DataType::Int => "int",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
        };
        write!(f, "{}", str)
    }
}

// === Values ===

/// A decoded property value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    String(String),
    Int(i64),
    Double(f64),
    Boolean(bool),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::None => DataType::None,
            Value::String(_) => DataType::String,
            Value::Int(_) => DataType::Int,
            Value::Double(_) => DataType::Double,
            Value::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Resets the value to the zero value of `data_type`.
    ///
    /// String storage is cleared in place so its capacity is kept for the
    /// next event.
    pub fn reset(&mut self, data_type: DataType) {
        match (self, data_type) {
            (Value::String(s), DataType::String) => s.clear(),
            (v, t) => *v = t.zero_value(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
