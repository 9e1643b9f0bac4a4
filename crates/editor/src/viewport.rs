//! Viewport
//!
//! The window of line numbers currently shown. `top` only ever moves by as
//! much as needed to keep the cursor line visible.

/// Visible range of line numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    visible_lines: usize,
}

impl Viewport {
    /// # Panics
    ///
    /// Panics if `visible_lines` is zero.
    pub fn new(visible_lines: usize) -> Self {
        assert!(visible_lines > 0, "viewport needs at least one line");
        Self {
            top: 0,
            visible_lines,
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    /// Last visible line number, always `top + visible_lines - 1`
    pub fn bottom(&self) -> usize {
        self.top + self.visible_lines - 1
    }

    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    pub fn contains(&self, line_number: usize) -> bool {
        (self.top..=self.bottom()).contains(&line_number)
    }

    /// Screen row of a line number, if it is visible
    pub fn row_of(&self, line_number: usize) -> Option<usize> {
        self.contains(line_number).then(|| line_number - self.top)
    }

    /// Scroll just enough to bring `cursor_line` into view
    pub fn reconcile(&mut self, cursor_line: usize) {
        if cursor_line < self.top {
            self.top = cursor_line;
        } else if cursor_line > self.bottom() {
            self.top = cursor_line - (self.bottom() - self.top);
        }
    }
}
