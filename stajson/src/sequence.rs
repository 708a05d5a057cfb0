// SPDX-License-Identifier: Apache-2.0

//! Forward iteration shared by array and object views.
//!
//! A [`SeqIter`] is either attached to a view that holds the current element,
//! or exhausted. Exhaustion is absorbing: reaching the closing event, running
//! out of stream, and failing all end there.

use core::fmt;
use core::iter::FusedIterator;
use core::ops::Deref;

use crate::StajError;

/// A container view that a [`SeqIter`] can drive.
///
/// The view owns a slot for at most one materialized element.
pub trait Sequence {
    type Item;

    /// True when the stream is on this container's opening event.
    fn at_start(&self) -> bool;

    /// True when the stream is on this container's closing event or has no
    /// more events.
    fn is_finished(&self) -> bool;

    /// Moves past the current position and decodes the next element into
    /// the slot.
    ///
    /// Returns `Ok(false)` with an empty slot once the container has closed
    /// or the stream is done.
    fn read_next(&mut self) -> Result<bool, StajError>;

    /// The element in the slot.
    fn current(&self) -> Option<&Self::Item>;

    /// Moves the element out of the slot.
    fn take_current(&mut self) -> Option<Self::Item>;
}

enum Link<'v, V> {
    Active(&'v mut V),
    Exhausted,
}

/// Forward iterator over a [`Sequence`].
///
/// Obtained from a view's `begin`/`begin_with`, compared against the view's
/// `end`. Also implements [`Iterator`] yielding `Result<V::Item, StajError>`,
/// moving each element out of the view.
pub struct SeqIter<'v, V> {
    link: Link<'v, V>,
}

impl<'v, V: Sequence> SeqIter<'v, V> {
    /// Attaches to `view` and reads the first element.
    ///
    /// A view whose stream is not on the container's opening event gives an
    /// exhausted iterator, not an error.
    pub fn begin(view: &'v mut V) -> Result<Self, StajError> {
        if !view.at_start() {
            log::trace!("stream not at container start, nothing to iterate");
            return Ok(Self::end());
        }
        let mut iter = SeqIter {
            link: Link::Active(view),
        };
        iter.step()?;
        Ok(iter)
    }

    /// Like [`begin`](Self::begin), but a failure is written to `error` and
    /// an exhausted iterator is returned.
    pub fn begin_with(view: &'v mut V, error: &mut Option<StajError>) -> Self {
        match Self::begin(view) {
            Ok(iter) => iter,
            Err(e) => {
                *error = Some(e);
                Self::end()
            }
        }
    }

    /// The exhausted sentinel.
    pub fn end() -> Self {
        SeqIter {
            link: Link::Exhausted,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.link, Link::Exhausted)
    }

    /// The current element, or `None` when exhausted or already moved out.
    pub fn current(&self) -> Option<&V::Item> {
        match &self.link {
            Link::Active(view) => view.current(),
            Link::Exhausted => None,
        }
    }

    /// Moves to the next element.
    pub fn advance(&mut self) -> Result<&mut Self, StajError> {
        self.step()?;
        Ok(self)
    }

    /// Moves to the next element, writing a failure to `error`.
    pub fn increment(&mut self, error: &mut Option<StajError>) -> &mut Self {
        if let Err(e) = self.step() {
            *error = Some(e);
        }
        self
    }

    /// Moves to the next element and returns the one that was current.
    ///
    /// If [`Iterator::next`] already moved the current element out, the next
    /// one is read first and returned in its place. If moving on fails, the
    /// previous element is dropped along with the error path.
    pub fn post_advance(&mut self) -> Result<Option<V::Item>, StajError> {
        self.refill()?;
        let previous = match &mut self.link {
            Link::Active(view) => view.take_current(),
            Link::Exhausted => return Ok(None),
        };
        self.step()?;
        Ok(previous)
    }

    /// [`post_advance`](Self::post_advance) with the error written to `error`.
    pub fn post_increment(&mut self, error: &mut Option<StajError>) -> Option<V::Item> {
        match self.post_advance() {
            Ok(previous) => previous,
            Err(e) => {
                *error = Some(e);
                None
            }
        }
    }

    /// Reads the next element if the slot was emptied by [`Iterator::next`].
    fn refill(&mut self) -> Result<(), StajError> {
        if matches!(&self.link, Link::Active(view) if view.current().is_none()) {
            self.step()
        } else {
            Ok(())
        }
    }

    fn step(&mut self) -> Result<(), StajError> {
        let Link::Active(view) = &mut self.link else {
            return Ok(());
        };
        match view.read_next() {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.link = Link::Exhausted;
                Ok(())
            }
            Err(e) => {
                self.link = Link::Exhausted;
                Err(e)
            }
        }
    }
}

/// Panics when there is no current element.
impl<V: Sequence> Deref for SeqIter<'_, V> {
    type Target = V::Item;

    fn deref(&self) -> &V::Item {
        match self.current() {
            Some(item) => item,
            None => panic!("dereferenced a sequence iterator with no current element"),
        }
    }
}

/// Exhausted iterators are equal to each other, and to an attached iterator
/// whose view has reached its closing event.
impl<V: Sequence> PartialEq for SeqIter<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.link, &other.link) {
            (Link::Exhausted, Link::Exhausted) => true,
            (Link::Active(view), Link::Exhausted) | (Link::Exhausted, Link::Active(view)) => {
                view.is_finished()
            }
            (Link::Active(_), Link::Active(_)) => false,
        }
    }
}

impl<V> fmt::Debug for SeqIter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.link {
            Link::Active(_) => "Active",
            Link::Exhausted => "Exhausted",
        };
        f.debug_tuple("SeqIter").field(&state).finish()
    }
}

impl<V: Sequence> Iterator for SeqIter<'_, V> {
    type Item = Result<V::Item, StajError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.refill() {
            return Some(Err(e));
        }
        match &mut self.link {
            Link::Active(view) => view.take_current().map(Ok),
            Link::Exhausted => None,
        }
    }
}

impl<V: Sequence> FusedIterator for SeqIter<'_, V> {}

/// Iterator returned by a view's `iter()`.
///
/// A failure while reading the first element is yielded as the first item.
pub struct Elements<'v, V> {
    pending: Option<StajError>,
    iter: SeqIter<'v, V>,
}

impl<'v, V: Sequence> Elements<'v, V> {
    pub fn new(view: &'v mut V) -> Self {
        match SeqIter::begin(view) {
            Ok(iter) => Elements {
                pending: None,
                iter,
            },
            Err(e) => Elements {
                pending: Some(e),
                iter: SeqIter::end(),
            },
        }
    }

    /// Switches to the error-slot convention.
    pub fn slotted<'e>(self, error: &'e mut Option<StajError>) -> Slotted<'e, Self> {
        Slotted::new(self, error)
    }
}

impl<V: Sequence> Iterator for Elements<'_, V> {
    type Item = Result<V::Item, StajError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pending.take() {
            Some(e) => Some(Err(e)),
            None => self.iter.next(),
        }
    }
}

impl<V: Sequence> FusedIterator for Elements<'_, V> {}

/// Yields plain elements, storing the first error in a caller-owned slot and
/// stopping there.
pub struct Slotted<'e, I> {
    inner: I,
    error: &'e mut Option<StajError>,
    failed: bool,
}

impl<'e, I> Slotted<'e, I> {
    pub fn new(inner: I, error: &'e mut Option<StajError>) -> Self {
        Slotted {
            inner,
            error,
            failed: false,
        }
    }
}

impl<T, I: Iterator<Item = Result<T, StajError>>> Iterator for Slotted<'_, I> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.failed {
            return None;
        }
        match self.inner.next()? {
            Ok(item) => Some(item),
            Err(e) => {
                self.failed = true;
                *self.error = Some(e);
                None
            }
        }
    }
}

impl<T, I: Iterator<Item = Result<T, StajError>>> FusedIterator for Slotted<'_, I> {}
