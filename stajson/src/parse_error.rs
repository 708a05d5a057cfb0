// SPDX-License-Identifier: Apache-2.0

use crate::shared::Position;
use crate::tokenizer;

/// Errors that can occur while reading or decoding JSON
#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    /// An error bubbled up from the underlying tokenizer.
    TokenizerError(tokenizer::Error),
    /// A string slice was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
    /// A number string could not be parsed.
    InvalidNumber,
    /// Invalid hex digits in Unicode escape sequence.
    InvalidUnicodeHex,
    /// Valid hex but invalid Unicode codepoint.
    InvalidUnicodeCodepoint,
    /// Invalid escape sequence character.
    InvalidEscapeSequence,
    /// Float encountered but float support is disabled and float-error is configured
    FloatNotAllowed,
    /// Numeric overflow
    NumericOverflow,
    /// The current event cannot be decoded into the requested type.
    TypeMismatch {
        /// What the decoder was looking for.
        expected: &'static str,
    },
    /// Nested decoding went deeper than the decode context allows.
    MaxDepthExceeded,
    /// The stream finished in the middle of a value.
    EndOfData,
}

impl From<tokenizer::Error> for ParseError {
    fn from(err: tokenizer::Error) -> Self {
        ParseError::TokenizerError(err)
    }
}

impl From<core::str::Utf8Error> for ParseError {
    fn from(err: core::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::TokenizerError(e) => write!(f, "{e}"),
            ParseError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
            ParseError::TypeMismatch { expected } => write!(f, "Expected {expected}"),
            _ => write!(f, "{self:?}"),
        }
    }
}

impl core::error::Error for ParseError {}

/// A [`ParseError`] tagged with the stream position where it happened.
///
/// This is what sequence iterators report, either as an `Err` in the
/// propagating convention or through the caller's error slot.
#[derive(Debug, PartialEq, Clone)]
pub struct StajError {
    kind: ParseError,
    position: Position,
}

impl StajError {
    pub fn new(kind: ParseError, position: Position) -> Self {
        Self { kind, position }
    }

    /// The underlying failure.
    pub fn kind(&self) -> &ParseError {
        &self.kind
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn into_kind(self) -> ParseError {
        self.kind
    }
}

impl core::fmt::Display for StajError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}

impl core::error::Error for StajError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.kind)
    }
}
