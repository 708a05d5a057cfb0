// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use core::ops::Deref;

/// Represents a JSON string or object key.
/// 'a is the lifetime of the original input buffer.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum JsonString<'a> {
    /// A raw slice from the original input, used when no un-escaping is needed.
    Borrowed(&'a str),
    /// An owned string, used when escape sequences had to be resolved.
    Unescaped(String),
}

impl JsonString<'_> {
    /// Returns the string as a `&str`, whether borrowed or unescaped.
    pub fn as_str(&self) -> &str {
        match self {
            JsonString::Borrowed(s) => s,
            JsonString::Unescaped(s) => s,
        }
    }

    /// Copies the content into an owned `String`, reusing the allocation when unescaped.
    pub fn into_owned(self) -> String {
        match self {
            JsonString::Borrowed(s) => String::from(s),
            JsonString::Unescaped(s) => s,
        }
    }
}

impl AsRef<str> for JsonString<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for JsonString<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl core::fmt::Display for JsonString<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
