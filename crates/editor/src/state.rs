//! Editor State
//!
//! Owns the document, the cursor and the viewport, and applies edits so
//! that every invariant holds again when a call returns.

use std::path::{Path, PathBuf};

use gapline_core::Result;
use tracing::{debug, info, trace, warn};

use crate::cursor::{Cursor, Direction};
use crate::document::{Document, LineId};
use crate::serializer;
use crate::viewport::Viewport;

/// Editing session over one document
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Document,
    cursor: Cursor,
    viewport: Viewport,
    /// File path (if opened from or saved to a file)
    path: Option<PathBuf>,
    /// Whether the document changed since the last load or save
    dirty: bool,
}

impl EditorState {
    /// Create an empty session
    pub fn new(capacity: usize, visible_lines: usize) -> Result<Self> {
        Ok(Self::with_document(Document::new(capacity)?, visible_lines))
    }

    /// Create a session from persisted bytes
    pub fn from_bytes(bytes: &[u8], capacity: usize, visible_lines: usize) -> Result<Self> {
        let document = serializer::from_bytes(bytes, capacity)?;
        Ok(Self::with_document(document, visible_lines))
    }

    /// Open a file.
    ///
    /// A file that cannot be read is not an error: the session starts from
    /// an empty document bound to `path`, and saving creates the file.
    pub async fn open(path: PathBuf, capacity: usize, visible_lines: usize) -> Result<Self> {
        let mut state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                info!("Opened {:?} ({} bytes)", path, bytes.len());
                Self::from_bytes(&bytes, capacity, visible_lines)?
            }
            Err(e) => {
                warn!("Could not read {:?}: {}; starting with an empty document", path, e);
                Self::new(capacity, visible_lines)?
            }
        };
        state.path = Some(path);
        Ok(state)
    }

    /// Save to the file this session is bound to
    pub async fn save(&mut self) -> Result<()> {
        match self.path.clone() {
            Some(path) => self.write_to(&path).await,
            None => Err(gapline_core::GaplineError::Config(
                "No file path set".to_string(),
            )),
        }
    }

    /// Save to a new file and bind the session to it
    pub async fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.write_to(&path).await?;
        self.path = Some(path);
        Ok(())
    }

    async fn write_to(&mut self, path: &Path) -> Result<()> {
        let bytes = serializer::to_bytes(&self.document);
        tokio::fs::write(path, &bytes).await?;
        self.dirty = false;
        info!("Saved {:?} ({} bytes)", path, bytes.len());
        Ok(())
    }

    fn with_document(mut document: Document, visible_lines: usize) -> Self {
        let first = document.first_line();
        let cursor = Cursor::new(&mut document, first);
        Self {
            document,
            cursor,
            viewport: Viewport::new(visible_lines.max(1)),
            path: None,
            dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persisted form of the current document
    pub fn to_bytes(&self) -> Vec<u8> {
        serializer::to_bytes(&self.document)
    }

    /// Line number of the cursor line
    pub fn cursor_line_number(&self) -> usize {
        self.document.line_number(self.cursor.line())
    }

    /// Insert one byte at the cursor.
    ///
    /// A full line is first made room in by cascading its last byte
    /// forward. Any line the edit needs is allocated before the document
    /// changes, so an out-of-memory error leaves everything as it was.
    pub fn insert_char(&mut self, byte: u8) -> Result<()> {
        let line = self.cursor.line();
        let column = self.cursor.column();

        if self.document.line(line).is_full() {
            self.document.cascade_forward(line)?;
        } else if self.document.line(line).len() + 1 == self.document.capacity()
            && self.document.next_in_paragraph(line).is_none()
        {
            // This byte fills the paragraph's last line, which then needs a
            // successor. Create it first so failure changes nothing.
            self.document.insert_line_after(line)?;
        }

        let text = self.document.line_mut(line);
        text.move_gap_to(column);
        text.insert(byte);

        self.cursor.move_to(&mut self.document, line, column + 1);
        self.cursor.settle(&mut self.document);
        self.finish_edit();
        trace!(byte, line = self.cursor_line_number(), column = self.cursor.column(), "inserted");
        Ok(())
    }

    /// Delete the byte before the cursor (Backspace).
    ///
    /// At the start of a wrapped line this deletes the last byte of the line
    /// above; at the start of a paragraph it joins the paragraph onto the
    /// previous one. Returns `false` at the very start of the document.
    pub fn delete_backward(&mut self) -> bool {
        let line = self.cursor.line();
        let column = self.cursor.column();

        if column > 0 {
            self.delete_before_gap(line, column);
            return true;
        }

        // Empty lines above the cursor hold nothing to delete; look past them.
        let mut target = self.document.prev_in_paragraph(line);
        while let Some(prev) = target {
            if !self.document.line(prev).is_empty() {
                break;
            }
            target = self.document.prev_in_paragraph(prev);
        }
        let paragraph = self.document.paragraph_of(line);
        if target.is_none() && self.document.prev_paragraph(paragraph).is_none() {
            return false;
        }

        while let Some(prev) = self.document.prev_in_paragraph(line) {
            if !self.document.line(prev).is_empty() {
                break;
            }
            self.document.remove_line(prev);
        }

        match target {
            Some(prev) => {
                let end = self.document.line(prev).len();
                self.document.line_mut(prev).move_gap_to(end);
                self.delete_before_gap(prev, end);
            }
            None => {
                if let Some((target, column)) = self.document.merge_paragraph_backward(paragraph) {
                    self.cursor.move_to(&mut self.document, target, column);
                }
                self.finish_edit();
            }
        }
        true
    }

    /// Delete the byte left of the gap on `line`, whose gap is at `column`.
    fn delete_before_gap(&mut self, line: LineId, column: usize) {
        let was_full = self.document.line(line).is_full();
        self.document.line_mut(line).delete_before_gap();
        self.cursor.move_to(&mut self.document, line, column - 1);
        if was_full {
            self.document.cascade_backward(line);
        }
        if self.document.line(line).is_empty() {
            self.drop_emptied_line(line);
        }
        self.finish_edit();
    }

    /// Remove a line that Backspace emptied, unless the paragraph still
    /// needs it: as its only line, or as the successor of a full line.
    fn drop_emptied_line(&mut self, line: LineId) {
        if let Some(next) = self.document.next_in_paragraph(line) {
            self.document.remove_line(line);
            self.cursor.move_to(&mut self.document, next, 0);
        } else if let Some(prev) = self.document.prev_in_paragraph(line) {
            if !self.document.line(prev).is_full() {
                let end = self.document.line(prev).len();
                self.document.remove_line(line);
                self.cursor.move_to(&mut self.document, prev, end);
            }
        }
    }

    /// Split the paragraph at the cursor (Enter). The cursor moves to the
    /// start of the new paragraph.
    pub fn split_paragraph(&mut self) -> Result<()> {
        let line = self.cursor.line();
        let column = self.cursor.column();
        let head = self.document.split_paragraph(line, column)?;
        self.cursor.move_to(&mut self.document, head, 0);
        self.finish_edit();
        Ok(())
    }

    /// Move the cursor. Returns `false` at a document boundary.
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let moved = self.cursor.move_direction(direction, &mut self.document);
        self.reconcile_viewport();
        debug_assert_eq!(
            self.cursor.column(),
            self.document.line(self.cursor.line()).gap_start(),
            "cursor is off the gap"
        );
        moved
    }

    /// Insert text as a sequence of single-byte commands; newlines split
    /// paragraphs. Stops at the first failing byte.
    pub fn insert_str(&mut self, text: &str) -> Result<()> {
        for byte in text.bytes() {
            if byte == serializer::PARAGRAPH_DELIMITER {
                self.split_paragraph()?;
            } else {
                self.insert_char(byte)?;
            }
        }
        Ok(())
    }

    fn finish_edit(&mut self) {
        self.dirty = true;
        self.reconcile_viewport();
        if cfg!(debug_assertions) {
            self.document.check_invariants();
            assert_eq!(
                self.cursor.column(),
                self.document.line(self.cursor.line()).gap_start(),
                "cursor is off the gap"
            );
        }
    }

    fn reconcile_viewport(&mut self) {
        let line = self.cursor_line_number();
        self.viewport.reconcile(line);
        debug!(
            top = self.viewport.top(),
            bottom = self.viewport.bottom(),
            cursor_line = line,
            "viewport reconciled"
        );
    }
}
