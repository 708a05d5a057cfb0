// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;
use core::str::FromStr;

use crate::ParseError;

// Type alias for the configured integer type
#[cfg(feature = "int32")]
pub type ConfiguredInt = i32;
#[cfg(feature = "int64")]
pub type ConfiguredInt = i64;

/// Represents the parsed result of a JSON number.
///
/// Depending on crate configuration for float support, either the `Float`
/// or the `FloatDisabled` variant is available.
#[derive(Debug, PartialEq, Clone)]
pub enum NumberResult {
    /// Integer that fits in the configured integer type
    Integer(ConfiguredInt),
    /// Integer too large for configured type (use raw string for exact representation)
    IntegerOverflow,
    /// Float value (only available with float feature)
    #[cfg(feature = "float")]
    Float(f64),
    /// Float outside the range of `f64` (use raw string for exact representation)
    #[cfg(feature = "float")]
    FloatOverflow,
    /// Float parsing disabled, the raw string is still available
    #[cfg(not(feature = "float"))]
    FloatDisabled,
}

/// Represents a JSON number with both exact string representation and parsed value.
///
/// Lifetime 'a is the input slice lifetime.
#[derive(Debug, PartialEq, Clone)]
pub struct JsonNumber<'a> {
    raw: &'a str,
    parsed: NumberResult,
}

impl<'a> JsonNumber<'a> {
    /// Create a JsonNumber from the raw bytes of a number token.
    ///
    /// The bytes are parsed according to the configured integer width and
    /// float support.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let raw = crate::shared::from_utf8(bytes)?;
        let parsed = if is_integer(bytes) {
            parse_integer(raw)
        } else {
            parse_float(raw)?
        };
        Ok(JsonNumber { raw, parsed })
    }

    /// Get the parsed NumberResult.
    pub fn parsed(&self) -> &NumberResult {
        &self.parsed
    }

    /// Get the number as the configurable integer type if it's an integer that fits.
    pub fn as_int(&self) -> Option<ConfiguredInt> {
        match self.parsed {
            NumberResult::Integer(val) => Some(val),
            _ => None,
        }
    }

    /// Get the number as an f64 if float support is enabled.
    /// For integers, converts to f64. For overflowing integers, parses the raw text.
    /// Floats out of `f64` range give `None`.
    #[cfg(feature = "float")]
    pub fn as_f64(&self) -> Option<f64> {
        match self.parsed {
            NumberResult::Float(val) => Some(val),
            NumberResult::Integer(val) => Some(val as f64),
            NumberResult::IntegerOverflow => f64::from_str(self.raw).ok(),
            NumberResult::FloatOverflow => None,
        }
    }

    /// Always available: get the exact string representation.
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Parse the number as a custom type using the exact string representation.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        T::from_str(self.raw)
    }

    /// Check if this number represents an integer (no decimal point or exponent).
    pub fn is_integer(&self) -> bool {
        matches!(
            self.parsed,
            NumberResult::Integer(_) | NumberResult::IntegerOverflow
        )
    }

    /// Returns true if this number has a decimal point or exponent.
    pub fn is_float(&self) -> bool {
        !self.is_integer()
    }
}

impl AsRef<str> for JsonNumber<'_> {
    fn as_ref(&self) -> &str {
        self.raw
    }
}

impl Deref for JsonNumber<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.raw
    }
}

impl core::fmt::Display for JsonNumber<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.parsed {
            NumberResult::Integer(val) => write!(f, "{val}"),
            #[cfg(feature = "float")]
            NumberResult::Float(val) => write!(f, "{val}"),
            // Overflow and disabled floats show the exact input text
            _ => f.write_str(self.raw),
        }
    }
}

/// Detects if a number byte slice represents an integer (no decimal point or exponent).
pub fn is_integer(bytes: &[u8]) -> bool {
    !bytes.iter().any(|&b| b == b'.' || b == b'e' || b == b'E')
}

fn parse_integer(raw: &str) -> NumberResult {
    match ConfiguredInt::from_str(raw) {
        Ok(val) => NumberResult::Integer(val),
        Err(_) => NumberResult::IntegerOverflow,
    }
}

#[cfg(feature = "float")]
fn parse_float(raw: &str) -> Result<NumberResult, ParseError> {
    match f64::from_str(raw) {
        Ok(val) if val.is_finite() => Ok(NumberResult::Float(val)),
        Ok(_) => Ok(NumberResult::FloatOverflow),
        Err(_) => Err(ParseError::InvalidNumber),
    }
}

#[cfg(not(feature = "float"))]
fn parse_float(raw: &str) -> Result<NumberResult, ParseError> {
    let _ = raw;
    #[cfg(feature = "float-error")]
    {
        Err(ParseError::FloatNotAllowed)
    }
    #[cfg(not(feature = "float-error"))]
    {
        Ok(NumberResult::FloatDisabled)
    }
}
