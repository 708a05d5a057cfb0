// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::parse_error::ParseError;

/// Pure functions for resolving JSON escape sequences.
///
/// The tokenizer has already checked escape syntax, so the errors returned
/// here cover what syntax alone cannot rule out: unpaired surrogates and
/// invalid code points.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// Process a simple escape sequence character and return the unescaped byte.
    ///
    /// # Examples
    /// ```ignore
    /// // Internal API - see unit tests for usage examples
    /// assert_eq!(EscapeProcessor::process_simple_escape(b'n').unwrap(), b'\n');
    /// ```
    pub fn process_simple_escape(escape_char: u8) -> Result<u8, ParseError> {
        match escape_char {
            b'n' => Ok(b'\n'),
            b't' => Ok(b'\t'),
            b'r' => Ok(b'\r'),
            b'\\' => Ok(b'\\'),
            b'"' => Ok(b'"'),
            b'/' => Ok(b'/'),
            b'b' => Ok(0x08), // Backspace
            b'f' => Ok(0x0C), // Form feed
            _ => Err(ParseError::InvalidEscapeSequence),
        }
    }

    /// Validate that a byte represents a valid hexadecimal digit.
    ///
    /// Returns the numeric value (0-15) of the hex digit.
    pub fn validate_hex_digit(byte: u8) -> Result<u32, ParseError> {
        match byte {
            b'0'..=b'9' => Ok((byte - b'0') as u32),
            b'a'..=b'f' => Ok((byte - b'a') as u32 + 10),
            b'A'..=b'F' => Ok((byte - b'A') as u32 + 10),
            _ => Err(ParseError::InvalidUnicodeHex),
        }
    }

    /// Check if a Unicode codepoint is a high surrogate (0xD800-0xDBFF)
    pub fn is_high_surrogate(codepoint: u32) -> bool {
        (0xD800..=0xDBFF).contains(&codepoint)
    }

    /// Check if a Unicode codepoint is a low surrogate (0xDC00-0xDFFF)
    pub fn is_low_surrogate(codepoint: u32) -> bool {
        (0xDC00..=0xDFFF).contains(&codepoint)
    }

    /// Combine a high and low surrogate pair into a single Unicode codepoint
    pub fn combine_surrogate_pair(high: u32, low: u32) -> Result<u32, ParseError> {
        if !Self::is_high_surrogate(high) || !Self::is_low_surrogate(low) {
            return Err(ParseError::InvalidUnicodeCodepoint);
        }
        Ok(0x10000 + ((high & 0x3FF) << 10) + (low & 0x3FF))
    }

    /// Decode the 4 hex digits of a `\uXXXX` escape.
    pub fn hex_codepoint(hex_slice: &[u8]) -> Result<u32, ParseError> {
        if hex_slice.len() != 4 {
            return Err(ParseError::InvalidUnicodeHex);
        }
        hex_slice.iter().try_fold(0u32, |codepoint, &byte| {
            Ok((codepoint << 4) | Self::validate_hex_digit(byte)?)
        })
    }

    /// Resolve every escape sequence in the raw content of a string token.
    ///
    /// `raw` is the text between the quotes. Surrogate pairs spread across
    /// two consecutive `\uXXXX` escapes are combined.
    pub fn unescape(raw: &[u8]) -> Result<String, ParseError> {
        let mut out: Vec<u8> = Vec::with_capacity(raw.len());
        let mut pending_high_surrogate: Option<u32> = None;
        let mut i = 0;
        while let Some(&byte) = raw.get(i) {
            if byte != b'\\' {
                if pending_high_surrogate.is_some() {
                    return Err(ParseError::InvalidUnicodeCodepoint);
                }
                out.push(byte);
                i += 1;
                continue;
            }
            let escape_char = *raw.get(i + 1).ok_or(ParseError::InvalidEscapeSequence)?;
            if escape_char != b'u' {
                if pending_high_surrogate.is_some() {
                    return Err(ParseError::InvalidUnicodeCodepoint);
                }
                out.push(Self::process_simple_escape(escape_char)?);
                i += 2;
                continue;
            }
            let hex = raw.get(i + 2..i + 6).ok_or(ParseError::InvalidUnicodeHex)?;
            let codepoint = Self::hex_codepoint(hex)?;
            i += 6;
            let resolved = match pending_high_surrogate.take() {
                Some(high) => Self::combine_surrogate_pair(high, codepoint)?,
                None if Self::is_high_surrogate(codepoint) => {
                    pending_high_surrogate = Some(codepoint);
                    continue;
                }
                None if Self::is_low_surrogate(codepoint) => {
                    return Err(ParseError::InvalidUnicodeCodepoint)
                }
                None => codepoint,
            };
            let ch = char::from_u32(resolved).ok_or(ParseError::InvalidUnicodeCodepoint)?;
            let mut utf8_buffer = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut utf8_buffer).as_bytes());
        }
        if pending_high_surrogate.is_some() {
            return Err(ParseError::InvalidUnicodeCodepoint);
        }
        String::from_utf8(out).map_err(|e| ParseError::InvalidUtf8(e.utf8_error()))
    }
}
