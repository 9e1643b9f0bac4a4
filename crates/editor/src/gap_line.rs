//! Gap Line
//!
//! A single fixed-capacity segment of text with an internal gap. The gap
//! sits at the cursor column of the line being edited, which makes typing
//! and backspacing at the cursor O(1).
//!
//! ```text
//!  [ left occupied | gap (unused) | right occupied ]
//!    0..gap_start    gap_start..gap_end   gap_end..capacity
//! ```
//!
//! The gap is half-open, so its width is `gap_end - gap_start` and a full
//! line is simply a line whose gap has width zero.

use gapline_core::{GaplineError, Result};

/// One visual wrap segment of a paragraph
#[derive(Clone, PartialEq, Eq)]
pub struct GapLine {
    storage: Box<[u8]>,
    gap_start: usize,
    gap_end: usize,
    len: usize,
}

impl GapLine {
    /// Create an empty line able to hold `capacity` bytes.
    ///
    /// The storage is reserved fallibly so that an allocation failure
    /// surfaces as [`GaplineError::OutOfMemory`] instead of aborting.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(GaplineError::InvalidCapacity(capacity));
        }
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| GaplineError::out_of_memory("line storage"))?;
        storage.resize(capacity, 0);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            gap_start: 0,
            gap_end: capacity,
            len: 0,
        })
    }

    /// Fixed number of bytes this line can hold
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of occupied bytes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Column of the gap, which is where the cursor sits on this line
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    pub fn gap_width(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Occupied bytes left of the gap
    pub fn left(&self) -> &[u8] {
        &self.storage[..self.gap_start]
    }

    /// Occupied bytes right of the gap
    pub fn right(&self) -> &[u8] {
        &self.storage[self.gap_end..]
    }

    /// Occupied bytes in order, skipping the gap
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.left().iter().chain(self.right()).copied()
    }

    /// Copy of the occupied bytes
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().collect()
    }

    /// Write `byte` at the left edge of the gap and advance the gap.
    ///
    /// # Panics
    ///
    /// Panics if the line is full. Callers make room with the forward
    /// cascade first.
    pub fn insert(&mut self, byte: u8) {
        assert!(!self.is_full(), "insert into a full line");
        self.storage[self.gap_start] = byte;
        self.gap_start += 1;
        self.len += 1;
        self.debug_check();
    }

    /// Move the gap so it starts at `column`.
    ///
    /// Only the bytes between the old and new gap positions are moved. On a
    /// full line the gap has no width and only its position changes.
    ///
    /// # Panics
    ///
    /// Panics if `column` is past the occupied length.
    pub fn move_gap_to(&mut self, column: usize) {
        assert!(column <= self.len, "gap column {column} past line length {}", self.len);

        if self.is_full() {
            self.gap_start = column;
            self.gap_end = column;
            return;
        }

        if column < self.gap_start {
            let count = self.gap_start - column;
            self.storage
                .copy_within(column..self.gap_start, self.gap_end - count);
            self.gap_start = column;
            self.gap_end -= count;
        } else if column > self.gap_start {
            let count = column - self.gap_start;
            self.storage
                .copy_within(self.gap_end..self.gap_end + count, self.gap_start);
            self.gap_start += count;
            self.gap_end += count;
        }
        self.debug_check();
    }

    /// Remove the byte just left of the gap.
    ///
    /// Returns `false` without touching anything when the gap is already at
    /// the start of the line.
    pub fn delete_before_gap(&mut self) -> bool {
        if self.gap_start == 0 {
            return false;
        }
        self.gap_start -= 1;
        self.len -= 1;
        self.debug_check();
        true
    }

    /// Remove and return the last occupied byte, keeping the gap column
    /// unless the gap sits after that byte.
    pub fn pop_back(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let capacity = self.capacity();
        let byte = if self.gap_end < capacity {
            let byte = self.storage[capacity - 1];
            self.storage
                .copy_within(self.gap_end..capacity - 1, self.gap_end + 1);
            self.gap_end += 1;
            byte
        } else {
            self.gap_start -= 1;
            self.storage[self.gap_start]
        };
        self.len -= 1;
        self.debug_check();
        Some(byte)
    }

    /// Remove and return the first occupied byte, keeping the gap column
    /// unless the gap was past that byte.
    pub fn pop_front(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let byte = if self.gap_start > 0 {
            let byte = self.storage[0];
            self.storage.copy_within(1..self.gap_start, 0);
            self.gap_start -= 1;
            byte
        } else {
            let byte = self.storage[self.gap_end];
            self.gap_end += 1;
            byte
        };
        self.len -= 1;
        self.debug_check();
        Some(byte)
    }

    /// Append `byte` after the last occupied byte, keeping the gap column.
    ///
    /// # Panics
    ///
    /// Panics if the line is full.
    pub fn push_back(&mut self, byte: u8) {
        assert!(!self.is_full(), "push into a full line");
        let capacity = self.capacity();
        self.storage.copy_within(self.gap_end..capacity, self.gap_end - 1);
        self.gap_end -= 1;
        self.storage[capacity - 1] = byte;
        self.len += 1;
        self.debug_check();
    }

    /// Prepend `byte` before the first occupied byte.
    ///
    /// # Panics
    ///
    /// Panics if the line is full.
    pub fn push_front(&mut self, byte: u8) {
        assert!(!self.is_full(), "push into a full line");
        if self.gap_start > 0 {
            self.storage.copy_within(0..self.gap_start, 1);
            self.storage[0] = byte;
            self.gap_start += 1;
        } else {
            self.gap_end -= 1;
            self.storage[self.gap_end] = byte;
        }
        self.len += 1;
        self.debug_check();
    }

    /// Move every byte right of the gap into `target`, which must be empty.
    ///
    /// The moved bytes land right of `target`'s gap, leaving its gap at
    /// column 0.
    pub fn split_off_right(&mut self, target: &mut GapLine) {
        assert!(target.is_empty(), "split target must be empty");
        assert_eq!(target.capacity(), self.capacity(), "capacity mismatch");

        let capacity = self.capacity();
        let count = capacity - self.gap_end;
        target.storage[capacity - count..].copy_from_slice(&self.storage[self.gap_end..]);
        target.gap_start = 0;
        target.gap_end = capacity - count;
        target.len = count;

        self.gap_end = capacity;
        self.len -= count;
        self.debug_check();
        target.debug_check();
    }

    /// Verify the occupancy and gap bookkeeping.
    ///
    /// # Panics
    ///
    /// Panics when the bookkeeping is inconsistent, which is always an
    /// implementation defect.
    pub fn check_invariants(&self) {
        assert!(
            self.gap_start <= self.gap_end && self.gap_end <= self.capacity(),
            "gap [{}, {}) out of bounds for capacity {}",
            self.gap_start,
            self.gap_end,
            self.capacity()
        );
        assert_eq!(
            self.len,
            self.capacity() - self.gap_width(),
            "occupied count disagrees with gap width"
        );
    }

    #[inline]
    fn debug_check(&self) {
        if cfg!(debug_assertions) {
            self.check_invariants();
        }
    }
}

impl std::fmt::Debug for GapLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GapLine")
            .field("left", &String::from_utf8_lossy(self.left()))
            .field("right", &String::from_utf8_lossy(self.right()))
            .field("capacity", &self.capacity())
            .finish()
    }
}
