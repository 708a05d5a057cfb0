// SPDX-License-Identifier: Apache-2.0

//! Turning the event under the cursor into a Rust value.
//!
//! A decoder is entered with the stream positioned on the first event of a
//! value. It returns with the stream positioned on the last event it consumed:
//! the scalar itself, or the matching end event of a container. Sequence views
//! rely on this to step to the following element.

use alloc::string::String;
use alloc::vec::Vec;

use crate::shared::{Event, TokenStream};
#[cfg(feature = "float")]
use crate::NumberResult;
use crate::{JsonNumber, ParseError};

/// Default nesting limit for [`DecodeContext`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options and bookkeeping shared by the decoders of one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    depth: usize,
    max_depth: usize,
}

impl DecodeContext {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// A context that refuses containers nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    /// Containers currently open in this context.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// Fails with [`ParseError::MaxDepthExceeded`] instead of entering a level
    /// past the limit. The depth is restored whether or not `f` succeeds.
    pub fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that can be read from a [`TokenStream`].
///
/// See the module documentation for where the stream must be on entry and
/// where it is left on success.
pub trait Decode: Sized {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        context: &mut DecodeContext,
    ) -> Result<Self, ParseError>;
}

impl Decode for bool {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        _context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        match stream.current() {
            Event::Bool(value) => Ok(*value),
            _ => Err(ParseError::TypeMismatch {
                expected: "a boolean",
            }),
        }
    }
}

/// Integer text ready for `FromStr`, with `-0` read as `0` so that
/// unsigned targets accept it.
fn integer_text<'a>(number: &JsonNumber<'a>) -> &'a str {
    let text = number.as_str();
    match text.strip_prefix('-') {
        Some(digits) if digits.bytes().all(|b| b == b'0') => digits,
        _ => text,
    }
}

macro_rules! impl_decode_int {
    ($($t:ty),*) => {
        $(
            impl Decode for $t {
                fn decode<S: TokenStream + ?Sized>(
                    stream: &mut S,
                    _context: &mut DecodeContext,
                ) -> Result<Self, ParseError> {
                    match stream.current() {
                        Event::Number(number) if number.is_integer() => integer_text(number)
                            .parse::<$t>()
                            .map_err(|_| ParseError::NumericOverflow),
                        _ => Err(ParseError::TypeMismatch {
                            expected: "an integer",
                        }),
                    }
                }
            }
        )*
    };
}

impl_decode_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(feature = "float")]
impl Decode for f64 {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        _context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        match stream.current() {
            Event::Number(number) => match number.parsed() {
                NumberResult::FloatOverflow => Err(ParseError::NumericOverflow),
                _ => number.as_f64().ok_or(ParseError::InvalidNumber),
            },
            _ => Err(ParseError::TypeMismatch {
                expected: "a number",
            }),
        }
    }
}

#[cfg(feature = "float")]
impl Decode for f32 {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        let value = f64::decode(stream, context)? as f32;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ParseError::NumericOverflow)
        }
    }
}

impl Decode for String {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        _context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        match stream.current() {
            Event::String(value) => Ok(String::from(value.as_str())),
            _ => Err(ParseError::TypeMismatch {
                expected: "a string",
            }),
        }
    }
}

/// `null` decodes to `None`, anything else to `Some` of the inner type.
impl<T: Decode> Decode for Option<T> {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        match stream.current() {
            Event::Null => Ok(None),
            _ => T::decode(stream, context).map(Some),
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<S: TokenStream + ?Sized>(
        stream: &mut S,
        context: &mut DecodeContext,
    ) -> Result<Self, ParseError> {
        if !matches!(stream.current(), Event::StartArray) {
            return Err(ParseError::TypeMismatch {
                expected: "an array",
            });
        }
        context.nested(|context| {
            let mut items = Vec::new();
            loop {
                stream.advance()?;
                match stream.current() {
                    Event::EndArray => return Ok(items),
                    _ if stream.is_done() => return Err(ParseError::EndOfData),
                    _ => items.push(T::decode(stream, context)?),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceCursor;
    use alloc::vec;
    use test_log::test;

    fn decode_str<T: Decode>(input: &str) -> Result<T, ParseError> {
        let mut cursor = SliceCursor::new(input).unwrap();
        T::decode(&mut cursor, &mut DecodeContext::new())
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode_str::<bool>("true"), Ok(true));
        assert_eq!(decode_str::<i32>("-17"), Ok(-17));
        assert_eq!(decode_str::<u64>("18446744073709551615"), Ok(u64::MAX));
        assert_eq!(decode_str::<String>(r#""hi\tthere""#), Ok(String::from("hi\tthere")));
        assert_eq!(decode_str::<Option<i32>>("null"), Ok(None));
        assert_eq!(decode_str::<Option<i32>>("5"), Ok(Some(5)));
    }

    #[test]
    #[cfg(feature = "float")]
    fn test_floats() {
        assert_eq!(decode_str::<f64>("2.5"), Ok(2.5));
        assert_eq!(decode_str::<f64>("7"), Ok(7.0));
        assert_eq!(decode_str::<f32>("0.5"), Ok(0.5));
        assert_eq!(decode_str::<f32>("1e300"), Err(ParseError::NumericOverflow));
        assert_eq!(decode_str::<f64>("1e400"), Err(ParseError::NumericOverflow));
        assert_eq!(decode_str::<f64>("-1e-400"), Ok(-0.0));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(decode_str::<u8>("256"), Err(ParseError::NumericOverflow));
        assert_eq!(decode_str::<u8>("-1"), Err(ParseError::NumericOverflow));
        assert_eq!(decode_str::<u8>("-0"), Ok(0));
        assert_eq!(decode_str::<i32>("-0"), Ok(0));
        assert_eq!(decode_str::<i16>("-12"), Ok(-12));
        assert_eq!(
            decode_str::<i64>("1.5"),
            Err(ParseError::TypeMismatch {
                expected: "an integer"
            })
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert_eq!(
            decode_str::<bool>("1"),
            Err(ParseError::TypeMismatch {
                expected: "a boolean"
            })
        );
        assert_eq!(
            decode_str::<Vec<i32>>(r#"{"a": 1}"#),
            Err(ParseError::TypeMismatch {
                expected: "an array"
            })
        );
    }

    #[test]
    fn test_vec_leaves_stream_on_end() {
        let mut cursor = SliceCursor::new("[[1, 2], [], [3]]").unwrap();
        let mut context = DecodeContext::new();
        let nested = Vec::<Vec<u8>>::decode(&mut cursor, &mut context).unwrap();
        assert_eq!(nested, vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(cursor.current(), &Event::EndArray);
        assert_eq!(context.depth(), 0);
        cursor.advance().unwrap();
        assert_eq!(cursor.current(), &Event::EndDocument);
    }

    #[test]
    fn test_nesting_limit() {
        let mut cursor = SliceCursor::new("[[[1]]]").unwrap();
        let mut context = DecodeContext::with_max_depth(2);
        assert_eq!(
            Vec::<Vec<Vec<u8>>>::decode(&mut cursor, &mut context),
            Err(ParseError::MaxDepthExceeded)
        );
        assert_eq!(context.depth(), 0);
        assert_eq!(context.max_depth(), 2);
    }
}
