// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::decode::{Decode, DecodeContext};
use crate::shared::{Event, TokenStream};
use crate::{JsonNumber, ParseError};

/// An owned JSON document tree.
///
/// Object members keep their source order, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// An integer that fits in `i64`.
    Integer(i64),
    /// A number with a fraction or exponent.
    #[cfg(feature = "float")]
    Float(f64),
    /// A number kept as its source text because no native type holds it.
    Number(String),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl Value {
    fn from_number(number: &JsonNumber<'_>) -> Self {
        #[cfg(feature = "float")]
        if number.is_float() {
            if let Some(value) = number.as_f64() {
                return Value::Float(value);
            }
        }
        if number.is_integer() {
            if let Ok(value) = number.parse::<i64>() {
                return Value::Integer(value);
            }
        }
        Value::Number(String::from(number.as_str()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            Value::Number(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(members) => Some(members),
            _ => None,
        }
    }

    /// First member named `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

impl Decode for Value {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        match stream.current() {
            Event::Null => Ok(Value::Null),
            Event::Bool(value) => Ok(Value::Bool(*value)),
            Event::Number(number) => Ok(Value::from_number(number)),
            Event::String(value) => Ok(Value::String(String::from(value.as_str()))),
            Event::StartArray => context.nested(|context| {
                let mut items = Vec::new();
                loop {
                    stream.advance()?;
                    match stream.current() {
                        Event::EndArray => return Ok(Value::Array(items)),
                        _ if stream.is_done() => return Err(ParseError::EndOfData),
                        _ => items.push(Value::decode(stream, context)?),
                    }
                }
            }),
            Event::StartObject => context.nested(|context| {
                let mut members = Vec::new();
                loop {
                    stream.advance()?;
                    let key = match stream.current() {
                        Event::EndObject => return Ok(Value::Object(members)),
                        Event::Key(key) => String::from(key.as_str()),
                        _ if stream.is_done() => return Err(ParseError::EndOfData),
                        _ => {
                            return Err(ParseError::TypeMismatch {
                                expected: "an object key",
                            })
                        }
                    };
                    stream.advance()?;
                    members.push((key, Value::decode(stream, context)?));
                }
            }),
            _ => Err(ParseError::TypeMismatch { expected: "a value" }),
        }
    }
}

/// Writes compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Integer(value) => write!(f, "{value}"),
            #[cfg(feature = "float")]
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Number(text) => f.write_str(text),
            Value::String(value) => write_quoted(f, value),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(members) => {
                f.write_str("{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
