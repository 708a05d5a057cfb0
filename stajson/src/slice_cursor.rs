// SPDX-License-Identifier: Apache-2.0

use crate::escape_processor::EscapeProcessor;
use crate::parse_error::{ParseError, StajError};
use crate::shared::{from_utf8, Event, Position, TokenStream};
use crate::tokenizer::{Token, Tokenizer};
use crate::{JsonNumber, JsonString};

/// Runtime limits for a [`SliceCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    /// Maximum container nesting accepted by the tokenizer.
    pub max_depth: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// A pull cursor over JSON held in memory.
///
/// The cursor always has a current [`Event`]: construction reads the first
/// one, and every [`advance`](TokenStream::advance) replaces it. Strings
/// without escapes are borrowed straight from the input.
///
/// Lifetime 'a is the input buffer lifetime.
pub struct SliceCursor<'a> {
    tokenizer: Tokenizer<'a>,
    current: Event<'a>,
    position: Position,
    done: bool,
}

impl<'a> SliceCursor<'a> {
    /// Creates a cursor for the given JSON input, positioned on its first event.
    ///
    /// # Example
    /// ```
    /// use stajson::{Event, SliceCursor, TokenStream};
    /// let cursor = SliceCursor::new(r#"{"name": "value"}"#).unwrap();
    /// assert_eq!(cursor.current(), &Event::StartObject);
    /// ```
    pub fn new(input: &'a str) -> Result<Self, StajError> {
        Self::with_config_from_slice(input.as_bytes(), CursorConfig::default())
    }

    /// Creates a cursor from a byte slice.
    pub fn new_from_slice(input: &'a [u8]) -> Result<Self, StajError> {
        Self::with_config_from_slice(input, CursorConfig::default())
    }

    /// Creates a cursor with custom limits.
    pub fn with_config(input: &'a str, config: CursorConfig) -> Result<Self, StajError> {
        Self::with_config_from_slice(input.as_bytes(), config)
    }

    /// Creates a cursor from a byte slice with custom limits.
    /// This is the core constructor that all other constructors delegate to.
    pub fn with_config_from_slice(input: &'a [u8], config: CursorConfig) -> Result<Self, StajError> {
        let mut cursor = SliceCursor {
            tokenizer: Tokenizer::new(input, config.max_depth),
            current: Event::EndDocument,
            position: Position { line: 1, column: 1 },
            done: false,
        };
        match cursor.advance() {
            Ok(()) => Ok(cursor),
            Err(kind) => Err(StajError::new(kind, cursor.position)),
        }
    }

    /// Advances and returns the new current event.
    pub fn next_event(&mut self) -> Result<&Event<'a>, ParseError> {
        self.advance()?;
        Ok(&self.current)
    }

    /// Stops the cursor; it reports [`is_done`](TokenStream::is_done) from now on.
    pub fn stop(&mut self) {
        self.done = true;
    }

    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.tokenizer.depth()
    }

    fn read_event(&mut self) -> Result<Event<'a>, ParseError> {
        let event = match self.tokenizer.next_token()? {
            Token::ObjectStart => Event::StartObject,
            Token::ObjectEnd => Event::EndObject,
            Token::ArrayStart => Event::StartArray,
            Token::ArrayEnd => Event::EndArray,
            Token::Key { raw, escaped } => Event::Key(Self::string(raw, escaped)?),
            Token::String { raw, escaped } => Event::String(Self::string(raw, escaped)?),
            Token::Number(raw) => Event::Number(JsonNumber::from_slice(raw)?),
            Token::True => Event::Bool(true),
            Token::False => Event::Bool(false),
            Token::Null => Event::Null,
            Token::Finished => Event::EndDocument,
        };
        Ok(event)
    }

    fn string(raw: &'a [u8], escaped: bool) -> Result<JsonString<'a>, ParseError> {
        if escaped {
            Ok(JsonString::Unescaped(EscapeProcessor::unescape(raw)?))
        } else {
            Ok(JsonString::Borrowed(from_utf8(raw)?))
        }
    }
}

impl TokenStream for SliceCursor<'_> {
    fn current(&self) -> &Event<'_> {
        &self.current
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        if self.done {
            return Ok(());
        }
        match self.read_event() {
            Ok(event) => {
                self.position = self.tokenizer.token_position();
                self.done = matches!(event, Event::EndDocument);
                log::trace!("{:?} at {}", event, self.position);
                self.current = event;
                Ok(())
            }
            Err(e) => {
                self.position = match &e {
                    ParseError::TokenizerError(err) => self.tokenizer.position_of(err.offset()),
                    _ => self.tokenizer.token_position(),
                };
                log::debug!("cursor failed at {}: {}", self.position, e);
                self.done = true;
                self.current = Event::EndDocument;
                Err(e)
            }
        }
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::ErrKind;
    use test_log::test;

    #[test]
    fn make_cursor() {
        let mut cursor = SliceCursor::new(r#"{"key": "value"}"#).unwrap();
        assert_eq!(cursor.current(), &Event::StartObject);
        assert_eq!(
            cursor.next_event(),
            Ok(&Event::Key(JsonString::Borrowed("key")))
        );
        assert_eq!(
            cursor.next_event(),
            Ok(&Event::String(JsonString::Borrowed("value")))
        );
        assert_eq!(cursor.next_event(), Ok(&Event::EndObject));
        assert!(!cursor.is_done());
        assert_eq!(cursor.next_event(), Ok(&Event::EndDocument));
        assert!(cursor.is_done());
        // Further advances are no-ops
        assert_eq!(cursor.next_event(), Ok(&Event::EndDocument));
    }

    #[test]
    fn parse_bool_null_and_numbers() {
        let mut cursor = SliceCursor::new(r#"[true, false, null, 124]"#).unwrap();
        assert_eq!(cursor.current(), &Event::StartArray);
        assert_eq!(cursor.next_event(), Ok(&Event::Bool(true)));
        assert_eq!(cursor.next_event(), Ok(&Event::Bool(false)));
        assert_eq!(cursor.next_event(), Ok(&Event::Null));
        match cursor.next_event() {
            Ok(Event::Number(num)) => {
                assert_eq!(num.as_str(), "124");
                assert_eq!(num.as_int(), Some(124));
            }
            other => panic!("Expected Number, got: {:?}", other),
        }
        assert_eq!(cursor.next_event(), Ok(&Event::EndArray));
        assert_eq!(cursor.next_event(), Ok(&Event::EndDocument));
    }

    #[test]
    fn test_escaped_strings_are_unescaped() {
        let input = r#"{"name": "John\nDoe", "plain": "x\u0041y"}"#;
        let mut cursor = SliceCursor::new(input).unwrap();

        match cursor.next_event() {
            Ok(Event::Key(key)) => assert!(matches!(key, JsonString::Borrowed("name"))),
            other => panic!("Expected Key event, got {:?}", other),
        }
        match cursor.next_event() {
            Ok(Event::String(JsonString::Unescaped(s))) => assert_eq!(s, "John\nDoe"),
            other => panic!("Expected unescaped string, got {:?}", other),
        }
        cursor.advance().unwrap();
        match cursor.next_event() {
            Ok(Event::String(s)) => assert_eq!(s.as_str(), "xAy"),
            other => panic!("Expected String event, got {:?}", other),
        }
    }

    #[test]
    fn test_surrogate_pair() {
        let mut cursor = SliceCursor::new(r#"["\uD83D\uDE00"]"#).unwrap();
        match cursor.next_event() {
            Ok(Event::String(s)) => assert_eq!(s.as_str(), "\u{1F600}"),
            other => panic!("Expected String event, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_surrogate_fails() {
        let mut cursor = SliceCursor::new(r#"["\uD83D"]"#).unwrap();
        assert_eq!(
            cursor.next_event(),
            Err(ParseError::InvalidUnicodeCodepoint)
        );
        assert!(cursor.is_done());
        assert_eq!(cursor.position(), Position { line: 1, column: 2 });
    }

    #[test]
    fn test_positions() {
        let mut cursor = SliceCursor::new("{\n  \"a\": [1,\n    2]\n}").unwrap();
        assert_eq!(cursor.position(), Position { line: 1, column: 1 });
        cursor.advance().unwrap(); // "a"
        assert_eq!(cursor.position(), Position { line: 2, column: 3 });
        cursor.advance().unwrap(); // [
        assert_eq!(cursor.position(), Position { line: 2, column: 8 });
        assert_eq!(cursor.depth(), 2);
        cursor.advance().unwrap(); // 1
        cursor.advance().unwrap(); // 2
        assert_eq!(cursor.position(), Position { line: 3, column: 5 });
        cursor.advance().unwrap(); // ]
        assert_eq!(cursor.position(), Position { line: 3, column: 6 });
        cursor.advance().unwrap(); // }
        assert_eq!(cursor.position(), Position { line: 4, column: 1 });
    }

    #[test]
    fn test_tokenizer_error_position_and_state() {
        let mut cursor = SliceCursor::new("[1,\n 2,]").unwrap();
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        match cursor.next_event() {
            Err(ParseError::TokenizerError(e)) => assert_eq!(e.kind(), ErrKind::TrailingComma),
            other => panic!("Expected TokenizerError, got {:?}", other),
        }
        assert_eq!(cursor.position(), Position { line: 2, column: 4 });
        assert!(cursor.is_done());
        assert_eq!(cursor.current(), &Event::EndDocument);
        // Done cursors stay put
        assert_eq!(cursor.advance(), Ok(()));
    }

    #[test]
    fn test_empty_input_fails_construction() {
        let err = SliceCursor::new("  ").err().unwrap();
        match err.kind() {
            ParseError::TokenizerError(e) => assert_eq!(e.kind(), ErrKind::EmptyStream),
            other => panic!("Expected EmptyStream, got {:?}", other),
        }
        assert_eq!(err.line(), 1);
        assert_eq!(err.column(), 3);
    }

    #[test]
    fn test_max_depth_config() {
        let config = CursorConfig { max_depth: 2 };
        let mut cursor = SliceCursor::with_config("[[[]]]", config).unwrap();
        cursor.advance().unwrap();
        match cursor.advance() {
            Err(ParseError::TokenizerError(e)) => assert_eq!(e.kind(), ErrKind::MaxDepthReached),
            other => panic!("Expected MaxDepthReached, got {:?}", other),
        }
    }

    #[test]
    fn test_stop() {
        let mut cursor = SliceCursor::new_from_slice(b"[1, 2]").unwrap();
        cursor.stop();
        assert!(cursor.is_done());
        assert_eq!(cursor.advance(), Ok(()));
        assert_eq!(cursor.current(), &Event::StartArray);
    }
}
