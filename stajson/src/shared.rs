// SPDX-License-Identifier: Apache-2.0

/// Shared components for JSON cursors and sequence views
use crate::{JsonNumber, JsonString, ParseError};

/// Events produced by a [`TokenStream`]
#[derive(Debug, PartialEq, Clone)]
pub enum Event<'a> {
    /// The start of an object (e.g., `{`).
    StartObject,
    /// The end of an object (e.g., `}`).
    EndObject,
    /// The start of an array (e.g., `[`).
    StartArray,
    /// The end of an array (e.g., `]`).
    EndArray,
    /// An object key (e.g., `"key":`).
    Key(JsonString<'a>),
    /// A string value (e.g., `"value"`).
    String(JsonString<'a>),
    /// A number value (e.g., `42` or `3.14`).
    Number(JsonNumber<'a>),
    /// A boolean value (e.g., `true` or `false`).
    Bool(bool),
    /// A null value (e.g., `null`).
    Null,
    /// End of the document.
    EndDocument,
}

impl Event<'_> {
    /// True for events that begin a value: scalars and container starts.
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            Event::StartObject
                | Event::StartArray
                | Event::String(_)
                | Event::Number(_)
                | Event::Bool(_)
                | Event::Null
        )
    }
}

/// Line and column in the source document, both 1-based.
///
/// Columns count bytes, not characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A pull-based source of structural events.
///
/// The stream always has a current event that can be inspected without
/// consuming it. Sequence views and [`Decode`](crate::Decode) implementations
/// drive the stream exclusively through this trait.
pub trait TokenStream {
    /// The event at the current position.
    fn current(&self) -> &Event<'_>;

    /// Moves to the next event.
    ///
    /// Once [`is_done`](Self::is_done) reports true this is a no-op.
    fn advance(&mut self) -> Result<(), ParseError>;

    /// True when no further events remain, after a failed advance, or when
    /// the consumer has chosen to stop.
    fn is_done(&self) -> bool;

    /// Source location of the current event, or of the failure after a failed advance.
    fn position(&self) -> Position;
}

/// Converts a byte slice to `&str`, reporting failures as [`ParseError`].
pub const fn from_utf8(v: &[u8]) -> Result<&str, ParseError> {
    match core::str::from_utf8(v) {
        Ok(s) => Ok(s),
        Err(e) => Err(ParseError::InvalidUtf8(e)),
    }
}
