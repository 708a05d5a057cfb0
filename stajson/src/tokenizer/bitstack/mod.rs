// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

const WORD_BITS: usize = u64::BITS as usize;

/// Growable bit stack tracking which containers are open.
///
/// A set bit marks an object, a clear bit an array. Storage grows one
/// `u64` word at a time, so typical documents never allocate more than once.
#[derive(Debug, Clone, Default)]
pub struct BitStack {
    words: Vec<u64>,
    depth: usize,
}

impl BitStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a bit (true for object, false for array) onto the stack.
    pub fn push(&mut self, bit: bool) {
        let (word, offset) = (self.depth / WORD_BITS, self.depth % WORD_BITS);
        if word == self.words.len() {
            self.words.push(0);
        }
        if let Some(slot) = self.words.get_mut(word) {
            if bit {
                *slot |= 1u64 << offset;
            } else {
                *slot &= !(1u64 << offset);
            }
        }
        self.depth += 1;
    }

    /// Pops the top bit, returning `None` when the stack is empty.
    pub fn pop(&mut self) -> Option<bool> {
        let top = self.top()?;
        self.depth -= 1;
        Some(top)
    }

    /// Returns the top bit without removing it.
    pub fn top(&self) -> Option<bool> {
        let index = self.depth.checked_sub(1)?;
        let word = self.words.get(index / WORD_BITS)?;
        Some(word & (1u64 << (index % WORD_BITS)) != 0)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
