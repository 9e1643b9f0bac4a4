//! Render View
//!
//! What a display layer needs after each command: where to put the
//! terminal cursor and which bytes to paint on each visible row. The engine
//! itself never draws.

use crate::document::{Document, LineId};
use crate::gap_line::GapLine;
use crate::state::EditorState;
use crate::viewport::Viewport;

/// Cursor position on screen, relative to the top of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPosition {
    pub row: usize,
    pub column: usize,
}

/// One line inside the viewport
#[derive(Debug, Clone, Copy)]
pub struct VisibleLine<'a> {
    /// Screen row, 0 at the top of the viewport
    pub row: usize,
    /// Line number in the document
    pub number: usize,
    text: &'a GapLine,
}

impl<'a> VisibleLine<'a> {
    /// Occupied bytes of the line, gap skipped
    pub fn bytes(&self) -> impl Iterator<Item = u8> + 'a {
        self.text.bytes()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Lossy UTF-8 rendering of the line
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text.to_vec()).into_owned()
    }
}

/// Iterator over the lines inside the viewport
pub struct VisibleLines<'a> {
    document: &'a Document,
    next: Option<LineId>,
    viewport: Viewport,
}

impl<'a> Iterator for VisibleLines<'a> {
    type Item = VisibleLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let number = self.document.line_number(id);
        let Some(row) = self.viewport.row_of(number) else {
            self.next = None;
            return None;
        };
        self.next = self.document.next_line(id);
        Some(VisibleLine {
            row,
            number,
            text: self.document.line(id),
        })
    }
}

impl EditorState {
    /// Screen position of the cursor
    pub fn cursor_screen_position(&self) -> ScreenPosition {
        ScreenPosition {
            row: self.cursor_line_number() - self.viewport().top(),
            column: self.cursor().column(),
        }
    }

    /// Lines from `viewport.top` to `viewport.bottom` that exist
    pub fn visible_lines(&self) -> VisibleLines<'_> {
        let document = self.document();
        let viewport = *self.viewport();
        VisibleLines {
            document,
            next: document.line_at(viewport.top()),
            viewport,
        }
    }

    /// Text of every visible row, for text-mode hosts
    pub fn render_frame(&self) -> Vec<String> {
        self.visible_lines()
            .map(|line| line.to_string_lossy())
            .collect()
    }
}
