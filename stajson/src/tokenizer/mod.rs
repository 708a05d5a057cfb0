// SPDX-License-Identifier: Apache-2.0

//! Byte-level JSON tokenizer.
//!
//! Walks a byte slice, validates the grammar (nesting, separators, literals,
//! number syntax, string escapes) and hands out raw token slices. Unescaping and
//! number interpretation happen one layer up, in the cursor.

mod bitstack;
pub use bitstack::BitStack;

use crate::shared::Position;

/// Raw token produced by the [`Tokenizer`].
///
/// String and key payloads are the bytes between the quotes, still escaped.
/// `escaped` tells whether any backslash escape occurred in them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Key { raw: &'a [u8], escaped: bool },
    String { raw: &'a [u8], escaped: bool },
    Number(&'a [u8]),
    True,
    False,
    Null,
    /// The root value is complete and only whitespace followed it.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Expect {
    RootValue,
    ArrayItemOrEnd,
    ArrayItem,
    ArrayCommaOrEnd,
    ObjectKeyOrEnd,
    ObjectKey,
    ObjectValue,
    ObjectCommaOrEnd,
    Finished,
}

#[derive(PartialEq, Clone)]
pub struct Error {
    kind: ErrKind,
    character: u8,
    position: usize,
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ErrKind {
    EmptyStream,
    UnfinishedStream,
    InvalidToken,
    UnescapedControlCharacter,
    TrailingComma,
    ContentEnded,
    MaxDepthReached,
    InvalidNumber,
    InvalidUnicodeEscape,
    InvalidStringEscape,
    ExpectedObjectKey,
    ExpectedColon,
    ExpectedCommaOrEnd,
}

impl Error {
    pub fn new<T>(kind: ErrKind, character: u8, position: usize) -> Result<T, Self> {
        Err(Self {
            kind,
            character,
            position,
        })
    }

    pub fn kind(&self) -> ErrKind {
        self.kind
    }

    /// Byte offset of the offending character.
    pub fn offset(&self) -> usize {
        self.position
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:?}({}) at {}",
            self.kind, self.character as char, self.position
        )
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?} at byte {}", self.kind, self.position)
    }
}

/// Pull tokenizer over a complete input slice.
pub struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    token_start: usize,
    expect: Expect,
    stack: BitStack,
    max_depth: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(data: &'a [u8], max_depth: usize) -> Self {
        Tokenizer {
            data,
            pos: 0,
            line: 1,
            line_start: 0,
            token_start: 0,
            expect: Expect::RootValue,
            stack: BitStack::new(),
            max_depth,
        }
    }

    /// Line and column of the first byte of the most recent token.
    pub fn token_position(&self) -> Position {
        self.position_of(self.token_start)
    }

    /// Line and column of a byte offset at or after the start of the current line.
    pub fn position_of(&self, offset: usize) -> Position {
        Position {
            line: self.line,
            column: offset.saturating_sub(self.line_start) + 1,
        }
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Produces the next token, or [`Token::Finished`] once the document is complete.
    pub fn next_token(&mut self) -> Result<Token<'a>, Error> {
        self.skip_whitespace();
        self.token_start = self.pos;
        let Some(&byte) = self.data.get(self.pos) else {
            return self.end_of_input();
        };
        match self.expect {
            Expect::Finished => Error::new(ErrKind::ContentEnded, byte, self.pos),
            Expect::RootValue | Expect::ObjectValue => self.value(byte),
            Expect::ArrayItem if byte == b']' => Error::new(ErrKind::TrailingComma, byte, self.pos),
            Expect::ArrayItem => self.value(byte),
            Expect::ArrayItemOrEnd if byte == b']' => self.close(false),
            Expect::ArrayItemOrEnd => self.value(byte),
            Expect::ArrayCommaOrEnd => match byte {
                b',' => {
                    self.pos += 1;
                    self.expect = Expect::ArrayItem;
                    self.next_token()
                }
                b']' => self.close(false),
                _ => Error::new(ErrKind::ExpectedCommaOrEnd, byte, self.pos),
            },
            Expect::ObjectKeyOrEnd => match byte {
                b'}' => self.close(true),
                b'"' => self.key(),
                _ => Error::new(ErrKind::ExpectedObjectKey, byte, self.pos),
            },
            Expect::ObjectKey => match byte {
                b'"' => self.key(),
                b'}' => Error::new(ErrKind::TrailingComma, byte, self.pos),
                _ => Error::new(ErrKind::ExpectedObjectKey, byte, self.pos),
            },
            Expect::ObjectCommaOrEnd => match byte {
                b',' => {
                    self.pos += 1;
                    self.expect = Expect::ObjectKey;
                    self.next_token()
                }
                b'}' => self.close(true),
                _ => Error::new(ErrKind::ExpectedCommaOrEnd, byte, self.pos),
            },
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            match byte {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn end_of_input(&self) -> Result<Token<'a>, Error> {
        match self.expect {
            Expect::Finished => Ok(Token::Finished),
            Expect::RootValue => Error::new(ErrKind::EmptyStream, b' ', self.pos),
            _ => Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
        }
    }

    /// Sets the expectation for whatever follows a complete value.
    fn after_value(&mut self) {
        self.expect = match self.stack.top() {
            Some(true) => Expect::ObjectCommaOrEnd,
            Some(false) => Expect::ArrayCommaOrEnd,
            None => Expect::Finished,
        };
    }

    fn open(&mut self, object: bool, byte: u8) -> Result<Token<'a>, Error> {
        if self.stack.depth() >= self.max_depth {
            return Error::new(ErrKind::MaxDepthReached, byte, self.pos);
        }
        self.pos += 1;
        self.stack.push(object);
        if object {
            self.expect = Expect::ObjectKeyOrEnd;
            Ok(Token::ObjectStart)
        } else {
            self.expect = Expect::ArrayItemOrEnd;
            Ok(Token::ArrayStart)
        }
    }

    fn close(&mut self, object: bool) -> Result<Token<'a>, Error> {
        // Expectation states only reach here with the matching container on top
        self.pos += 1;
        self.stack.pop();
        self.after_value();
        Ok(if object {
            Token::ObjectEnd
        } else {
            Token::ArrayEnd
        })
    }

    fn value(&mut self, byte: u8) -> Result<Token<'a>, Error> {
        match byte {
            b'{' => self.open(true, byte),
            b'[' => self.open(false, byte),
            b'"' => {
                let (raw, escaped) = self.string()?;
                self.after_value();
                Ok(Token::String { raw, escaped })
            }
            b't' => self.literal(b"true", Token::True),
            b'f' => self.literal(b"false", Token::False),
            b'n' => self.literal(b"null", Token::Null),
            b'-' | b'0'..=b'9' => {
                let raw = self.number()?;
                self.after_value();
                Ok(Token::Number(raw))
            }
            _ => Error::new(ErrKind::InvalidToken, byte, self.pos),
        }
    }

    fn key(&mut self) -> Result<Token<'a>, Error> {
        let (raw, escaped) = self.string()?;
        self.skip_whitespace();
        match self.data.get(self.pos) {
            Some(b':') => {
                self.pos += 1;
                self.expect = Expect::ObjectValue;
                Ok(Token::Key { raw, escaped })
            }
            Some(&other) => Error::new(ErrKind::ExpectedColon, other, self.pos),
            None => Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
        }
    }

    fn literal(&mut self, word: &'static [u8], token: Token<'a>) -> Result<Token<'a>, Error> {
        for (i, &expected) in word.iter().enumerate() {
            match self.data.get(self.pos + i) {
                Some(&byte) if byte == expected => {}
                Some(&byte) => return Error::new(ErrKind::InvalidToken, byte, self.pos + i),
                None => return Error::new(ErrKind::UnfinishedStream, b' ', self.pos + i),
            }
        }
        self.pos += word.len();
        self.after_value();
        Ok(token)
    }

    /// Scans a quoted string starting at the opening quote.
    fn string(&mut self) -> Result<(&'a [u8], bool), Error> {
        self.pos += 1;
        let start = self.pos;
        let mut escaped = false;
        loop {
            match self.data.get(self.pos) {
                None => return Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
                Some(b'"') => {
                    let raw = self.data.get(start..self.pos).unwrap_or_default();
                    self.pos += 1;
                    return Ok((raw, escaped));
                }
                Some(b'\\') => {
                    escaped = true;
                    self.pos += 1;
                    self.escape()?;
                }
                Some(&byte) if byte < 0x20 => {
                    return Error::new(ErrKind::UnescapedControlCharacter, byte, self.pos)
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Validates the escape following a backslash.
    fn escape(&mut self) -> Result<(), Error> {
        match self.data.get(self.pos) {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => {
                self.pos += 1;
                Ok(())
            }
            Some(b'u') => {
                self.pos += 1;
                for _ in 0..4 {
                    match self.data.get(self.pos) {
                        Some(byte) if byte.is_ascii_hexdigit() => self.pos += 1,
                        Some(&byte) => {
                            return Error::new(ErrKind::InvalidUnicodeEscape, byte, self.pos)
                        }
                        None => return Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
                    }
                }
                Ok(())
            }
            Some(&byte) => Error::new(ErrKind::InvalidStringEscape, byte, self.pos),
            None => Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
        }
    }

    /// Scans `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
    fn number(&mut self) -> Result<&'a [u8], Error> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.digits(),
            other => return self.number_error(other),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.required_digits()?;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            self.required_digits()?;
        }
        Ok(self.data.get(start..self.pos).unwrap_or_default())
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    fn required_digits(&mut self) -> Result<(), Error> {
        match self.peek() {
            Some(b'0'..=b'9') => {
                self.digits();
                Ok(())
            }
            other => self.number_error(other),
        }
    }

    fn number_error<T>(&self, found: Option<u8>) -> Result<T, Error> {
        match found {
            Some(byte) => Error::new(ErrKind::InvalidNumber, byte, self.pos),
            None => Error::new(ErrKind::UnfinishedStream, b' ', self.pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use test_log::test;

    fn tokenize(input: &str) -> Result<Vec<Token<'_>>, Error> {
        let mut tokenizer = Tokenizer::new(input.as_bytes(), 64);
        let mut tokens = Vec::new();
        loop {
            match tokenizer.next_token()? {
                Token::Finished => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }

    fn error_kind(input: &str) -> ErrKind {
        match tokenize(input) {
            Err(e) => e.kind(),
            Ok(tokens) => panic!("Expected error for {:?}, got {:?}", input, tokens),
        }
    }

    #[test]
    fn test_simple_object() {
        let tokens = tokenize(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        assert_eq!(
            tokens,
            [
                Token::ObjectStart,
                Token::Key {
                    raw: b"a",
                    escaped: false
                },
                Token::Number(b"1"),
                Token::Key {
                    raw: b"b",
                    escaped: false
                },
                Token::ArrayStart,
                Token::True,
                Token::Null,
                Token::ArrayEnd,
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn test_escaped_string_is_flagged() {
        let tokens = tokenize(r#"["a\nb", "plain"]"#).unwrap();
        assert_eq!(
            tokens[1],
            Token::String {
                raw: br"a\nb",
                escaped: true
            }
        );
        assert_eq!(
            tokens[2],
            Token::String {
                raw: b"plain",
                escaped: false
            }
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("[0, -1, 12.5, 1e10, -0.5E-3]").unwrap();
        let numbers: Vec<&[u8]> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Number(raw) => Some(*raw),
                _ => None,
            })
            .collect();
        let expected: [&[u8]; 5] = [b"0", b"-1", b"12.5", b"1e10", b"-0.5E-3"];
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_grammar_errors() {
        assert_eq!(error_kind(""), ErrKind::EmptyStream);
        assert_eq!(error_kind("   "), ErrKind::EmptyStream);
        assert_eq!(error_kind("[1, 2"), ErrKind::UnfinishedStream);
        assert_eq!(error_kind("[1,]"), ErrKind::TrailingComma);
        assert_eq!(error_kind(r#"{"a":1,}"#), ErrKind::TrailingComma);
        assert_eq!(error_kind("[1] 2"), ErrKind::ContentEnded);
        assert_eq!(error_kind("[1 2]"), ErrKind::ExpectedCommaOrEnd);
        assert_eq!(error_kind(r#"{"a" 1}"#), ErrKind::ExpectedColon);
        assert_eq!(error_kind("{1: 2}"), ErrKind::ExpectedObjectKey);
        assert_eq!(error_kind("[tru]"), ErrKind::InvalidToken);
        assert_eq!(error_kind("[01]"), ErrKind::ExpectedCommaOrEnd);
        assert_eq!(error_kind("[1.]"), ErrKind::InvalidNumber);
        assert_eq!(error_kind("[-]"), ErrKind::InvalidNumber);
        assert_eq!(error_kind(r#"["\x"]"#), ErrKind::InvalidStringEscape);
        assert_eq!(error_kind(r#"["\u12g4"]"#), ErrKind::InvalidUnicodeEscape);
        assert_eq!(error_kind("[\"a\u{1}\"]"), ErrKind::UnescapedControlCharacter);
        assert_eq!(error_kind("]"), ErrKind::InvalidToken);
    }

    #[test]
    fn test_max_depth() {
        let mut tokenizer = Tokenizer::new(b"[[[1]]]", 2);
        assert_eq!(tokenizer.next_token(), Ok(Token::ArrayStart));
        assert_eq!(tokenizer.next_token(), Ok(Token::ArrayStart));
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.kind(), ErrKind::MaxDepthReached);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_positions_track_lines() {
        let input = "[\n  1,\n    true\n]";
        let mut tokenizer = Tokenizer::new(input.as_bytes(), 8);
        assert_eq!(tokenizer.next_token(), Ok(Token::ArrayStart));
        assert_eq!(tokenizer.token_position(), Position { line: 1, column: 1 });
        assert_eq!(tokenizer.next_token(), Ok(Token::Number(b"1")));
        assert_eq!(tokenizer.token_position(), Position { line: 2, column: 3 });
        assert_eq!(tokenizer.next_token(), Ok(Token::True));
        assert_eq!(tokenizer.token_position(), Position { line: 3, column: 5 });
        assert_eq!(tokenizer.next_token(), Ok(Token::ArrayEnd));
        assert_eq!(tokenizer.token_position(), Position { line: 4, column: 1 });
        assert_eq!(tokenizer.next_token(), Ok(Token::Finished));
        assert_eq!(tokenizer.next_token(), Ok(Token::Finished));
    }

    #[test]
    fn test_scalar_root() {
        assert_eq!(tokenize(" 42 ").unwrap(), [Token::Number(b"42")]);
        assert_eq!(error_kind("42 43"), ErrKind::ContentEnded);
    }
}
