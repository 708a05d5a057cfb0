// SPDX-License-Identifier: Apache-2.0

use crate::decode::{Decode, DecodeContext};
use crate::sequence::{Elements, SeqIter, Sequence, Slotted};
use crate::shared::{Event, TokenStream};
use crate::{ParseError, StajError};

/// Iterator over the elements of an [`ArrayView`].
pub type ArrayIter<'v, 's, S, T> = SeqIter<'v, ArrayView<'s, S, T>>;

/// Lazy view over the elements of the array the stream is positioned on.
///
/// Nothing is read until an iterator is started. Each step decodes exactly
/// one element, so a caller can stop early without touching the rest of the
/// document.
///
/// # Example
/// ```
/// use stajson::{iter_array, SliceCursor};
///
/// let mut cursor = SliceCursor::new("[1, 2, 3]").unwrap();
/// let mut view = iter_array::<i64, _>(&mut cursor);
/// let items: Result<Vec<_>, _> = view.iter().collect();
/// assert_eq!(items.unwrap(), [1, 2, 3]);
/// ```
pub struct ArrayView<'s, S: ?Sized, T> {
    stream: &'s mut S,
    context: DecodeContext,
    value: Option<T>,
}

impl<'s, S: TokenStream + ?Sized, T: Decode> ArrayView<'s, S, T> {
    pub fn new(stream: &'s mut S) -> Self {
        Self::with_context(stream, DecodeContext::default())
    }

    /// A view whose elements are decoded with `context`.
    pub fn with_context(stream: &'s mut S, context: DecodeContext) -> Self {
        ArrayView {
            stream,
            context,
            value: None,
        }
    }

    /// Starts iterating, reading the first element.
    pub fn begin(&mut self) -> Result<ArrayIter<'_, 's, S, T>, StajError> {
        SeqIter::begin(self)
    }

    /// Starts iterating; a failure on the first element goes to `error`.
    pub fn begin_with(&mut self, error: &mut Option<StajError>) -> ArrayIter<'_, 's, S, T> {
        SeqIter::begin_with(self, error)
    }

    /// The exhausted iterator every finished traversal compares equal to.
    pub fn end<'v>(&self) -> ArrayIter<'v, 's, S, T>
    where
        Self: 'v,
    {
        SeqIter::end()
    }

    /// Elements as a standard iterator of `Result`s.
    pub fn iter(&mut self) -> Elements<'_, Self> {
        Elements::new(self)
    }

    /// Elements as plain values; iteration stops at the first failure,
    /// which is stored in `error`.
    pub fn iter_with<'e>(
        &mut self,
        error: &'e mut Option<StajError>,
    ) -> Slotted<'e, Elements<'_, Self>> {
        self.iter().slotted(error)
    }

    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    fn fail(&self, kind: ParseError) -> StajError {
        let error = StajError::new(kind, self.stream.position());
        log::debug!("array element failed: {}", error);
        error
    }
}

impl<S: TokenStream + ?Sized, T: Decode> Sequence for ArrayView<'_, S, T> {
    type Item = T;

    fn at_start(&self) -> bool {
        !self.stream.is_done() && matches!(self.stream.current(), Event::StartArray)
    }

    fn is_finished(&self) -> bool {
        self.stream.is_done() || matches!(self.stream.current(), Event::EndArray)
    }

    fn read_next(&mut self) -> Result<bool, StajError> {
        self.value = None;
        if self.is_finished() {
            log::trace!("array exhausted at {}", self.stream.position());
            return Ok(false);
        }
        self.stream.advance().map_err(|kind| self.fail(kind))?;
        if self.is_finished() {
            log::trace!("array exhausted at {}", self.stream.position());
            return Ok(false);
        }
        let value = T::decode(&mut *self.stream, &mut self.context).map_err(|kind| self.fail(kind))?;
        self.value = Some(value);
        Ok(true)
    }

    fn current(&self) -> Option<&T> {
        self.value.as_ref()
    }

    fn take_current(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<'v, 's, S: TokenStream + ?Sized, T: Decode> IntoIterator for &'v mut ArrayView<'s, S, T> {
    type Item = Result<T, StajError>;
    type IntoIter = Elements<'v, ArrayView<'s, S, T>>;

    fn into_iter(self) -> Self::IntoIter {
        Elements::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SliceCursor, Value};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use test_log::test;

    #[test]
    fn test_begin_end_loop() {
        let mut cursor = SliceCursor::new("[10, 20, 30]").unwrap();
        let mut view = ArrayView::<_, u32>::new(&mut cursor);
        let end = view.end();
        let mut seen = Vec::new();
        let mut iter = view.begin().unwrap();
        while iter != end {
            seen.push(*iter);
            iter.advance().unwrap();
        }
        assert_eq!(seen, [10, 20, 30]);
    }

    #[test]
    fn test_deref_is_stable() {
        let mut cursor = SliceCursor::new(r#"["a", "b"]"#).unwrap();
        let mut view = ArrayView::<_, String>::new(&mut cursor);
        let iter = view.begin().unwrap();
        assert_eq!(iter.as_str(), "a");
        assert_eq!(iter.as_str(), "a");
    }

    #[test]
    fn test_empty_array() {
        let mut cursor = SliceCursor::new("[ ]").unwrap();
        let mut view = ArrayView::<_, u32>::new(&mut cursor);
        let iter = view.begin().unwrap();
        assert!(iter.is_exhausted());
        assert_eq!(cursor.current(), &Event::EndArray);
    }

    #[test]
    fn test_not_an_array() {
        let mut cursor = SliceCursor::new(r#"{"a": 1}"#).unwrap();
        let mut view = ArrayView::<_, u32>::new(&mut cursor);
        assert!(view.begin().unwrap().is_exhausted());
        let mut error = None;
        assert!(view.begin_with(&mut error).is_exhausted());
        assert!(error.is_none());
        assert_eq!(view.iter().count(), 0);
        // Stream untouched
        assert_eq!(cursor.current(), &Event::StartObject);
    }

    #[test]
    fn test_nested_elements_resume_at_sibling() {
        let mut cursor = SliceCursor::new(r#"[[1, [2]], {"k": [3]}, 4]"#).unwrap();
        let mut view = ArrayView::<_, Value>::new(&mut cursor);
        let items: Vec<Value> = view.iter().collect::<Result<_, _>>().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], Value::Integer(4));
        assert_eq!(
            items[1].get("k"),
            Some(&Value::Array(vec![Value::Integer(3)]))
        );
    }

    #[test]
    fn test_for_loop_over_view() {
        let mut cursor = SliceCursor::new("[true, false]").unwrap();
        let mut view = ArrayView::<_, bool>::new(&mut cursor);
        let mut flags = Vec::new();
        for flag in &mut view {
            flags.push(flag.unwrap());
        }
        assert_eq!(flags, [true, false]);
    }

    /// Decodes an integer and then steps one event further than it should.
    struct Greedy(i64);

    impl Decode for Greedy {
        fn decode<S: TokenStream + ?Sized>(
            stream: &mut S,
            context: &mut DecodeContext,
        ) -> Result<Self, ParseError> {
            let value = i64::decode(stream, context)?;
            stream.advance()?;
            Ok(Greedy(value))
        }
    }

    #[test]
    fn test_iterator_at_closing_event_equals_end() {
        let mut cursor = SliceCursor::new("[5]").unwrap();
        let mut view = ArrayView::<_, Greedy>::new(&mut cursor);
        let end = view.end();
        let iter = view.begin().unwrap();
        assert!(!iter.is_exhausted());
        assert_eq!(iter.0, 5);
        assert!(iter == end);
    }
}
