//! Document Model
//!
//! A document is a chain of paragraphs, and each paragraph owns a chain of
//! [`GapLine`]s. Lines are also linked across paragraph boundaries so the
//! whole document can be walked line by line.
//!
//! Both chains live in arenas and are addressed by [`LineId`] and
//! [`ParagraphId`] handles. Splicing and splitting are handle rewiring.
//!
//! Paragraph boundaries are the only thing persisted as newlines. Lines are
//! wrap segments of a fixed capacity and never produce a byte of their own.

use gapline_core::Result;
use tracing::debug;

use crate::arena::Arena;
use crate::gap_line::GapLine;

/// Handle to a line of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(usize);

/// Handle to a paragraph of a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParagraphId(usize);

#[derive(Debug, Clone)]
struct LineNode {
    text: GapLine,
    number: usize,
    paragraph: ParagraphId,
    prev: Option<LineId>,
    next: Option<LineId>,
}

#[derive(Debug, Clone)]
struct ParagraphNode {
    first: LineId,
    last: LineId,
    prev: Option<ParagraphId>,
    next: Option<ParagraphId>,
}

/// The editable document
#[derive(Debug, Clone)]
pub struct Document {
    capacity: usize,
    lines: Arena<LineNode>,
    paragraphs: Arena<ParagraphNode>,
    head: ParagraphId,
    tail: ParagraphId,
}

impl Document {
    /// Create a document holding one empty paragraph with one empty line
    pub fn new(capacity: usize) -> Result<Self> {
        let text = GapLine::with_capacity(capacity)?;
        let mut lines = Arena::new("line");
        let mut paragraphs = Arena::new("paragraph");

        let line = LineId(lines.alloc(LineNode {
            text,
            number: 0,
            paragraph: ParagraphId(0),
            prev: None,
            next: None,
        })?);
        let paragraph = ParagraphId(paragraphs.alloc(ParagraphNode {
            first: line,
            last: line,
            prev: None,
            next: None,
        })?);
        lines.get_mut(line.0).paragraph = paragraph;

        Ok(Self {
            capacity,
            lines,
            paragraphs,
            head: paragraph,
            tail: paragraph,
        })
    }

    /// Bytes per line, fixed for the lifetime of the document
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn line(&self, id: LineId) -> &GapLine {
        &self.lines.get(id.0).text
    }

    pub fn line_mut(&mut self, id: LineId) -> &mut GapLine {
        &mut self.lines.get_mut(id.0).text
    }

    /// 0-based position of the line in the whole document
    pub fn line_number(&self, id: LineId) -> usize {
        self.lines.get(id.0).number
    }

    pub fn paragraph_of(&self, id: LineId) -> ParagraphId {
        self.lines.get(id.0).paragraph
    }

    /// Previous line in document order, crossing paragraph boundaries
    pub fn prev_line(&self, id: LineId) -> Option<LineId> {
        self.lines.get(id.0).prev
    }

    /// Next line in document order, crossing paragraph boundaries
    pub fn next_line(&self, id: LineId) -> Option<LineId> {
        self.lines.get(id.0).next
    }

    /// Previous line of the same paragraph
    pub fn prev_in_paragraph(&self, id: LineId) -> Option<LineId> {
        let paragraph = self.paragraphs.get(self.paragraph_of(id).0);
        if paragraph.first == id {
            None
        } else {
            self.prev_line(id)
        }
    }

    /// Next line of the same paragraph
    pub fn next_in_paragraph(&self, id: LineId) -> Option<LineId> {
        let paragraph = self.paragraphs.get(self.paragraph_of(id).0);
        if paragraph.last == id {
            None
        } else {
            self.next_line(id)
        }
    }

    pub fn first_line(&self) -> LineId {
        self.paragraphs.get(self.head.0).first
    }

    pub fn last_line(&self) -> LineId {
        self.paragraphs.get(self.tail.0).last
    }

    pub fn first_paragraph(&self) -> ParagraphId {
        self.head
    }

    pub fn last_paragraph(&self) -> ParagraphId {
        self.tail
    }

    pub fn prev_paragraph(&self, id: ParagraphId) -> Option<ParagraphId> {
        self.paragraphs.get(id.0).prev
    }

    pub fn next_paragraph(&self, id: ParagraphId) -> Option<ParagraphId> {
        self.paragraphs.get(id.0).next
    }

    pub fn paragraph_first_line(&self, id: ParagraphId) -> LineId {
        self.paragraphs.get(id.0).first
    }

    pub fn paragraph_last_line(&self, id: ParagraphId) -> LineId {
        self.paragraphs.get(id.0).last
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = ParagraphId> + '_ {
        std::iter::successors(Some(self.head), move |&id| self.next_paragraph(id))
    }

    /// All lines in document order
    pub fn lines(&self) -> impl Iterator<Item = LineId> + '_ {
        std::iter::successors(Some(self.first_line()), move |&id| self.next_line(id))
    }

    /// Lines of one paragraph in order
    pub fn paragraph_lines(&self, id: ParagraphId) -> impl Iterator<Item = LineId> + '_ {
        std::iter::successors(Some(self.paragraph_first_line(id)), move |&line| {
            self.next_in_paragraph(line)
        })
    }

    /// Find the line with the given line number
    pub fn line_at(&self, number: usize) -> Option<LineId> {
        self.lines().nth(number)
    }

    /// Total number of occupied bytes across all lines
    pub fn byte_count(&self) -> usize {
        self.lines().map(|id| self.line(id).len()).sum()
    }

    /// Occupied bytes of a whole paragraph, wrap points removed
    pub fn paragraph_bytes(&self, id: ParagraphId) -> Vec<u8> {
        self.paragraph_lines(id)
            .flat_map(|line| self.line(line).bytes())
            .collect()
    }

    /// Append a new empty paragraph after the last one
    pub fn push_paragraph(&mut self) -> Result<ParagraphId> {
        let tail = self.tail;
        let line = self.alloc_line(tail)?;
        let paragraph = match self.paragraphs.alloc(ParagraphNode {
            first: line,
            last: line,
            prev: Some(tail),
            next: None,
        }) {
            Ok(index) => ParagraphId(index),
            Err(e) => {
                self.lines.free(line.0);
                return Err(e);
            }
        };

        let previous_last = self.paragraphs.get(tail.0).last;
        {
            let node = self.lines.get_mut(line.0);
            node.paragraph = paragraph;
            node.prev = Some(previous_last);
        }
        self.lines.get_mut(previous_last.0).next = Some(line);
        self.paragraphs.get_mut(tail.0).next = Some(paragraph);
        self.tail = paragraph;
        self.renumber_from(line);
        Ok(paragraph)
    }

    /// Append a new empty line at the end of a paragraph
    pub fn append_line(&mut self, paragraph: ParagraphId) -> Result<LineId> {
        let last = self.paragraph_last_line(paragraph);
        self.insert_line_after(last)
    }

    /// Insert a new empty line right after `after`, in the same paragraph
    pub fn insert_line_after(&mut self, after: LineId) -> Result<LineId> {
        let line = self.alloc_line(self.paragraph_of(after))?;
        self.link_line_after(after, line);
        Ok(line)
    }

    /// Unlink and free a line.
    ///
    /// # Panics
    ///
    /// Panics if the line is the only line of its paragraph.
    pub fn remove_line(&mut self, id: LineId) {
        let node = self.lines.get(id.0);
        let (prev, next, paragraph) = (node.prev, node.next, node.paragraph);

        let owner = self.paragraphs.get_mut(paragraph.0);
        assert!(
            !(owner.first == id && owner.last == id),
            "a paragraph must keep at least one line"
        );
        if owner.first == id {
            owner.first = next.expect("paragraph has a following line");
        }
        if owner.last == id {
            owner.last = prev.expect("paragraph has a preceding line");
        }

        if let Some(prev) = prev {
            self.lines.get_mut(prev.0).next = next;
        }
        if let Some(next) = next {
            self.lines.get_mut(next.0).prev = prev;
        }
        self.lines.free(id.0);
        debug!(line = id.0, "removed line");

        if let Some(start) = prev.or(next) {
            self.renumber_from(start);
        }
    }

    /// Split the paragraph owning `line` at `column` (Enter).
    ///
    /// The line keeps the bytes left of `column` and becomes the last line
    /// of its paragraph. A new paragraph starts with a fresh line holding the
    /// bytes right of `column`, followed by the lines that came after `line`.
    /// Returns the new paragraph's first line.
    pub fn split_paragraph(&mut self, line: LineId, column: usize) -> Result<LineId> {
        let old = self.paragraph_of(line);
        let head = self.alloc_line(old)?;
        let old_next = self.paragraphs.get(old.0).next;
        let new = match self.paragraphs.alloc(ParagraphNode {
            first: head,
            last: head,
            prev: Some(old),
            next: old_next,
        }) {
            Ok(index) => ParagraphId(index),
            Err(e) => {
                self.lines.free(head.0);
                return Err(e);
            }
        };

        // Nothing below can fail.
        self.line_mut(line).move_gap_to(column);
        {
            let (source, target) = self.lines.pair_mut(line.0, head.0);
            source.text.split_off_right(&mut target.text);
        }

        let tail_start = self.next_in_paragraph(line);
        let old_last = self.paragraphs.get(old.0).last;
        let after = self.next_line(line);
        {
            let node = self.lines.get_mut(head.0);
            node.paragraph = new;
            node.prev = Some(line);
            node.next = after;
        }
        if let Some(after) = after {
            self.lines.get_mut(after.0).prev = Some(head);
        }
        self.lines.get_mut(line.0).next = Some(head);

        if let Some(start) = tail_start {
            self.paragraphs.get_mut(new.0).last = old_last;
            let mut cursor = Some(start);
            while let Some(id) = cursor {
                self.lines.get_mut(id.0).paragraph = new;
                cursor = if id == old_last { None } else { self.next_line(id) };
            }
        }
        self.paragraphs.get_mut(old.0).last = line;
        self.paragraphs.get_mut(old.0).next = Some(new);
        match old_next {
            Some(next) => self.paragraphs.get_mut(next.0).prev = Some(new),
            None => self.tail = new,
        }

        self.renumber_from(line);
        self.prune_trailing_empty(new);
        debug!(
            line = self.line_number(line),
            column, "split paragraph"
        );
        Ok(head)
    }

    /// Merge a paragraph into the one before it (Backspace at paragraph start).
    ///
    /// The previous paragraph's last line gets its gap moved to its end, the
    /// merged paragraph's lines are spliced after it, and the merged
    /// paragraph is freed. Returns where the cursor lands: the end of the
    /// previous paragraph's former last line. Returns `None` for the first
    /// paragraph.
    pub fn merge_paragraph_backward(&mut self, id: ParagraphId) -> Option<(LineId, usize)> {
        let prev = self.prev_paragraph(id)?;
        let target = self.paragraph_last_line(prev);
        let end = self.line(target).len();
        self.line_mut(target).move_gap_to(end);

        let node = self.paragraphs.get(id.0).clone();
        let mut cursor = Some(node.first);
        while let Some(line) = cursor {
            self.lines.get_mut(line.0).paragraph = prev;
            cursor = if line == node.last { None } else { self.next_line(line) };
        }
        {
            let merged = self.paragraphs.get_mut(prev.0);
            merged.last = node.last;
            merged.next = node.next;
        }
        match node.next {
            Some(next) => self.paragraphs.get_mut(next.0).prev = Some(prev),
            None => self.tail = prev,
        }
        self.paragraphs.free(id.0);

        // An empty first line carries no bytes once the paragraphs are joined.
        if self.line(node.first).is_empty() {
            self.remove_line(node.first);
        }
        self.renumber_from(target);
        debug!(line = self.line_number(target), "merged paragraph backward");
        Some((target, end))
    }

    /// Recompute line numbers from `start` to the end of the document.
    ///
    /// Every line gets its predecessor's number plus one; the first line of
    /// the document is 0. Running it twice changes nothing.
    pub fn renumber_from(&mut self, start: LineId) {
        let mut number = match self.prev_line(start) {
            Some(prev) => self.line_number(prev) + 1,
            None => 0,
        };
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let node = self.lines.get_mut(id.0);
            node.number = number;
            number += 1;
            cursor = node.next;
        }
    }

    /// Verify every structural invariant of the document.
    ///
    /// # Panics
    ///
    /// Panics on the first violation found. A violation is always a bug in
    /// the engine, never a user-facing condition.
    pub fn check_invariants(&self) {
        let mut expected_number = 0;
        let mut expected_prev_line: Option<LineId> = None;
        let mut expected_prev_paragraph: Option<ParagraphId> = None;

        for paragraph in self.paragraphs() {
            let node = self.paragraphs.get(paragraph.0);
            assert_eq!(node.prev, expected_prev_paragraph, "paragraph back link");

            let mut line = node.first;
            loop {
                let line_node = self.lines.get(line.0);
                line_node.text.check_invariants();
                assert_eq!(line_node.text.capacity(), self.capacity, "line capacity");
                assert_eq!(line_node.paragraph, paragraph, "line owner");
                assert_eq!(line_node.prev, expected_prev_line, "line back link");
                assert_eq!(line_node.number, expected_number, "line number");

                expected_number += 1;
                expected_prev_line = Some(line);
                if line == node.last {
                    break;
                }
                line = line_node.next.expect("paragraph chain ends early");
            }

            assert!(
                !self.line(node.last).is_full(),
                "full line {} ends its paragraph",
                self.line_number(node.last)
            );
            expected_prev_paragraph = Some(paragraph);
        }

        assert_eq!(Some(self.tail), expected_prev_paragraph, "tail paragraph");
        assert_eq!(self.next_line(self.last_line()), None, "trailing line link");
        assert_eq!(expected_number, self.line_count(), "orphaned lines");
    }

    /// Allocate a detached empty line owned by `paragraph`
    pub(crate) fn alloc_line(&mut self, paragraph: ParagraphId) -> Result<LineId> {
        let text = GapLine::with_capacity(self.capacity)?;
        let index = self.lines.alloc(LineNode {
            text,
            number: 0,
            paragraph,
            prev: None,
            next: None,
        })?;
        Ok(LineId(index))
    }

    /// Free a line that was allocated but never linked
    pub(crate) fn discard_line(&mut self, id: LineId) {
        self.lines.free(id.0);
    }

    /// Link a detached line right after `after`, in the same paragraph
    pub(crate) fn link_line_after(&mut self, after: LineId, line: LineId) {
        let paragraph = self.paragraph_of(after);
        let next = self.next_line(after);
        {
            let node = self.lines.get_mut(line.0);
            node.paragraph = paragraph;
            node.prev = Some(after);
            node.next = next;
        }
        if let Some(next) = next {
            self.lines.get_mut(next.0).prev = Some(line);
        }
        self.lines.get_mut(after.0).next = Some(line);

        let owner = self.paragraphs.get_mut(paragraph.0);
        if owner.last == after {
            owner.last = line;
        }
        self.renumber_from(after);
        debug!(line = self.line_number(line), "new line");
    }

    pub(crate) fn pair_mut(&mut self, a: LineId, b: LineId) -> (&mut GapLine, &mut GapLine) {
        let (a, b) = self.lines.pair_mut(a.0, b.0);
        (&mut a.text, &mut b.text)
    }

    /// Drop an empty last line that no longer follows a full line
    pub(crate) fn prune_trailing_empty(&mut self, paragraph: ParagraphId) {
        let last = self.paragraph_last_line(paragraph);
        if let Some(prev) = self.prev_in_paragraph(last) {
            if self.line(last).is_empty() && !self.line(prev).is_full() {
                self.remove_line(last);
            }
        }
    }
}
