// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::decode::{Decode, DecodeContext};
use crate::sequence::{Elements, SeqIter, Sequence, Slotted};
use crate::shared::{Event, TokenStream};
use crate::{ParseError, StajError};

/// Iterator over the members of an [`ObjectView`].
pub type ObjectIter<'v, 's, S, T> = SeqIter<'v, ObjectView<'s, S, T>>;

/// Lazy view over the `(key, value)` members of the object the stream is
/// positioned on.
///
/// Members come out in document order, duplicate keys included. Values are
/// decoded as `T`; keys are always owned strings.
///
/// # Example
/// ```
/// use stajson::{iter_object, SliceCursor};
///
/// let mut cursor = SliceCursor::new(r#"{"x": 1, "y": 2}"#).unwrap();
/// let mut view = iter_object::<u8, _>(&mut cursor);
/// let mut error = None;
/// let members: Vec<(String, u8)> = view.iter_with(&mut error).collect();
/// assert!(error.is_none());
/// assert_eq!(members[1], ("y".to_string(), 2));
/// ```
pub struct ObjectView<'s, S: ?Sized, T> {
    stream: &'s mut S,
    context: DecodeContext,
    member: Option<(String, T)>,
}

impl<'s, S: TokenStream + ?Sized, T: Decode> ObjectView<'s, S, T> {
    pub fn new(stream: &'s mut S) -> Self {
        Self::with_context(stream, DecodeContext::default())
    }

    /// A view whose values are decoded with `context`.
    pub fn with_context(stream: &'s mut S, context: DecodeContext) -> Self {
        ObjectView {
            stream,
            context,
            member: None,
        }
    }

    /// Starts iterating, reading the first member.
    pub fn begin(&mut self) -> Result<ObjectIter<'_, 's, S, T>, StajError> {
        SeqIter::begin(self)
    }

    /// Starts iterating; a failure on the first member goes to `error`.
    pub fn begin_with(&mut self, error: &mut Option<StajError>) -> ObjectIter<'_, 's, S, T> {
        SeqIter::begin_with(self, error)
    }

    pub fn end<'v>(&self) -> ObjectIter<'v, 's, S, T>
    where
        Self: 'v,
    {
        SeqIter::end()
    }

    pub fn iter(&mut self) -> Elements<'_, Self> {
        Elements::new(self)
    }

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
        log::debug!("object member failed: {}", error);
        error
    }
}

impl<S: TokenStream + ?Sized, T: Decode> Sequence for ObjectView<'_, S, T> {
    type Item = (String, T);

    fn at_start(&self) -> bool {
        !self.stream.is_done() && matches!(self.stream.current(), Event::StartObject)
    }

    fn is_finished(&self) -> bool {
        self.stream.is_done() || matches!(self.stream.current(), Event::EndObject)
    }

    /// # Panics
    /// If the stream yields anything but a key where a member starts, or a
    /// key that is not followed by a value.
    fn read_next(&mut self) -> Result<bool, StajError> {
        self.member = None;
        if self.is_finished() {
            log::trace!("object exhausted at {}", self.stream.position());
            return Ok(false);
        }
        self.stream.advance().map_err(|kind| self.fail(kind))?;
        if self.is_finished() {
            log::trace!("object exhausted at {}", self.stream.position());
            return Ok(false);
        }
        let key = match self.stream.current() {
            Event::Key(key) => String::from(key.as_str()),
            other => panic!("object member must start with a key, found {:?}", other),
        };
        self.stream.advance().map_err(|kind| self.fail(kind))?;
        if self.stream.is_done() {
            log::trace!("stream ended after key {:?}", key);
            return Ok(false);
        }
        assert!(
            self.stream.current().is_value_start(),
            "object key {:?} not followed by a value, found {:?}",
            key,
            self.stream.current()
        );
        let value = T::decode(&mut *self.stream, &mut self.context).map_err(|kind| self.fail(kind))?;
        self.member = Some((key, value));
        Ok(true)
    }

    fn current(&self) -> Option<&(String, T)> {
        self.member.as_ref()
    }

    fn take_current(&mut self) -> Option<(String, T)> {
        self.member.take()
    }
}

impl<'v, 's, S: TokenStream + ?Sized, T: Decode> IntoIterator for &'v mut ObjectView<'s, S, T> {
    type Item = Result<(String, T), StajError>;
    type IntoIter = Elements<'v, ObjectView<'s, S, T>>;

    fn into_iter(self) -> Self::IntoIter {
        Elements::new(self)
    }
}
