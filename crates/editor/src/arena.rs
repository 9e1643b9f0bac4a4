//! Slot arena backing the line and paragraph chains.
//!
//! Nodes are addressed by stable indices. Freed slots are recycled, and
//! growth is reserved fallibly so the caller sees an out-of-memory error
//! rather than an abort.

use gapline_core::{GaplineError, Result};

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    live: usize,
    what: &'static str,
}

impl<T> Arena<T> {
    pub(crate) fn new(what: &'static str) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            what,
        }
    }

    pub(crate) fn alloc(&mut self, value: T) -> Result<usize> {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(value);
            self.live += 1;
            return Ok(index);
        }
        self.slots
            .try_reserve(1)
            .map_err(|_| GaplineError::out_of_memory(self.what))?;
        self.slots.push(Some(value));
        self.live += 1;
        Ok(self.slots.len() - 1)
    }

    pub(crate) fn free(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.live -= 1;
        // Pushing here can only fail if the free list itself cannot grow; in
        // that case the slot simply stays unused.
        if self.free.try_reserve(1).is_ok() {
            self.free.push(index);
        }
        Some(value)
    }

    /// # Panics
    ///
    /// Panics on a freed or unknown index: handles never outlive their node.
    pub(crate) fn get(&self, index: usize) -> &T {
        match self.slots.get(index) {
            Some(Some(value)) => value,
            _ => panic!("stale {} handle {}", self.what, index),
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> &mut T {
        match self.slots.get_mut(index) {
            Some(Some(value)) => value,
            _ => panic!("stale {} handle {}", self.what, index),
        }
    }

    /// Borrow two distinct nodes mutably at once.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut T, &mut T) {
        assert_ne!(a, b, "pair_mut needs two distinct {} handles", self.what);
        let what = self.what;
        let (low, high) = (a.min(b), a.max(b));
        let (head, tail) = self.slots.split_at_mut(high);
        let low_ref = head[low]
            .as_mut()
            .unwrap_or_else(|| panic!("stale {} handle {}", what, low));
        let high_ref = tail[0]
            .as_mut()
            .unwrap_or_else(|| panic!("stale {} handle {}", what, high));
        if a < b {
            (low_ref, high_ref)
        } else {
            (high_ref, low_ref)
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
