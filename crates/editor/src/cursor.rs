//! Cursor Management
//!
//! The cursor is a line handle plus a column, and it always sits at the gap
//! of its line: moving the cursor moves the gap.

use tracing::trace;

use crate::document::{Document, LineId};

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The text cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Line the cursor is on
    line: LineId,
    /// Column within the line, equal to the line's gap start
    column: usize,
    /// Column a vertical move could not reach yet (the "fail value")
    preferred_column: Option<usize>,
}

impl Cursor {
    /// Place a cursor at the start of `line`
    pub fn new(document: &mut Document, line: LineId) -> Self {
        let mut cursor = Self {
            line,
            column: 0,
            preferred_column: None,
        };
        cursor.move_to(document, line, 0);
        cursor
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Remembered column from an Up/Down that landed on a shorter line
    pub fn preferred_column(&self) -> Option<usize> {
        self.preferred_column
    }

    /// Largest column the cursor may take on `line`.
    ///
    /// A full line has no column after its last byte; that position is
    /// column 0 of the next line.
    pub fn column_limit(document: &Document, line: LineId) -> usize {
        let text = document.line(line);
        if text.is_full() {
            text.capacity() - 1
        } else {
            text.len()
        }
    }

    /// Move to `line` at `column` and bring the gap along. Clears the
    /// remembered column.
    pub fn move_to(&mut self, document: &mut Document, line: LineId, column: usize) {
        self.place(document, line, column);
        self.preferred_column = None;
    }

    /// Move one step in `direction`.
    ///
    /// Returns `false` when the move is blocked by the start or end of the
    /// document; nothing changes in that case.
    pub fn move_direction(&mut self, direction: Direction, document: &mut Document) -> bool {
        let moved = match direction {
            Direction::Left => self.move_left(document),
            Direction::Right => self.move_right(document),
            Direction::Up => {
                let target = document.prev_line(self.line);
                self.move_vertical(document, target)
            }
            Direction::Down => {
                let target = document.next_line(self.line);
                self.move_vertical(document, target)
            }
        };
        trace!(
            ?direction,
            line = document.line_number(self.line),
            column = self.column,
            preferred = ?self.preferred_column,
            moved,
            "cursor moved"
        );
        moved
    }

    /// Settle a cursor that ended up after the last byte of a full line onto
    /// column 0 of the next line of the paragraph.
    pub fn settle(&mut self, document: &mut Document) {
        if self.column == document.capacity() {
            let next = document
                .next_in_paragraph(self.line)
                .expect("a full line always has a successor");
            self.place(document, next, 0);
        }
    }

    fn move_left(&mut self, document: &mut Document) -> bool {
        if self.column > 0 {
            let column = self.column - 1;
            self.move_to(document, self.line, column);
            return true;
        }
        match document.prev_line(self.line) {
            Some(prev) => {
                let column = Self::column_limit(document, prev);
                self.move_to(document, prev, column);
                true
            }
            None => false,
        }
    }

    fn move_right(&mut self, document: &mut Document) -> bool {
        if self.column < Self::column_limit(document, self.line) {
            let column = self.column + 1;
            self.move_to(document, self.line, column);
            return true;
        }
        match document.next_line(self.line) {
            Some(next) => {
                self.move_to(document, next, 0);
                true
            }
            None => false,
        }
    }

    fn move_vertical(&mut self, document: &mut Document, target: Option<LineId>) -> bool {
        let Some(target) = target else {
            return false;
        };
        let desired = self.preferred_column.unwrap_or(self.column);
        let column = desired.min(Self::column_limit(document, target));
        self.place(document, target, column);
        self.preferred_column = if column < desired { Some(desired) } else { None };
        true
    }

    fn place(&mut self, document: &mut Document, line: LineId, column: usize) {
        document.line_mut(line).move_gap_to(column);
        self.line = line;
        self.column = column;
    }
}
