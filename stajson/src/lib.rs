// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), no_std)]

//! Lazy, typed iteration over the arrays and objects of a pull-based JSON
//! event stream.
//!
//! Position a [`TokenStream`] on a container, wrap it in a view with
//! [`iter_array`] or [`iter_object`], and pull elements one at a time. Each
//! element is decoded through [`Decode`] only when the iterator reaches it.
//!
//! ```
//! use stajson::{iter_object, SliceCursor, Value};
//!
//! let mut cursor = SliceCursor::new(r#"{"id": 7, "tags": ["a"]}"#).unwrap();
//! for member in &mut iter_object::<Value, _>(&mut cursor) {
//!     let (key, value) = member.unwrap();
//!     println!("{key} = {value}");
//! }
//! ```

extern crate alloc;

// Compile-time configuration validation
mod config_check;

mod tokenizer;
pub use tokenizer::{ErrKind, Error as TokenizerError};

mod escape_processor;

mod shared;
pub use shared::{Event, Position, TokenStream};

mod parse_error;
pub use parse_error::{ParseError, StajError};

mod json_number;
pub use json_number::{ConfiguredInt, JsonNumber, NumberResult};

mod json_string;
pub use json_string::JsonString;

mod slice_cursor;
pub use slice_cursor::{CursorConfig, SliceCursor};

mod decode;
pub use decode::{Decode, DecodeContext, DEFAULT_MAX_DEPTH};

mod value;
pub use value::Value;

mod sequence;
pub use sequence::{Elements, SeqIter, Sequence, Slotted};

mod array_view;
pub use array_view::{ArrayIter, ArrayView};

mod object_view;
pub use object_view::{ObjectIter, ObjectView};

/// Views the elements of the array `stream` is positioned on, decoded as `T`.
///
/// If the current event is not the start of an array the view is empty.
pub fn iter_array<T: Decode, S: TokenStream + ?Sized>(stream: &mut S) -> ArrayView<'_, S, T> {
    ArrayView::new(stream)
}

/// Views the members of the object `stream` is positioned on, with values
/// decoded as `T`.
///
/// If the current event is not the start of an object the view is empty.
pub fn iter_object<T: Decode, S: TokenStream + ?Sized>(stream: &mut S) -> ObjectView<'_, S, T> {
    ObjectView::new(stream)
}
