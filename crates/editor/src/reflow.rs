//! Reflow
//!
//! Keeps fixed-capacity lines consistent when an edit overflows or
//! underflows a full line. Both passes walk a run of consecutive full lines
//! inside one paragraph and shift exactly one byte per line, so their cost is
//! bounded by the length of that run.

use gapline_core::Result;
use tracing::debug;

use crate::document::{Document, LineId};

impl Document {
    /// Make room for one byte in the full line `start`.
    ///
    /// Walks the run of full lines beginning at `start` and moves the last
    /// byte of each into the front of its successor. The first non-full
    /// line of the paragraph absorbs the final byte; if the run reaches the
    /// end of the paragraph still full, a new trailing line is created. A
    /// receiving line that becomes full at the end of its paragraph gets an
    /// empty successor, so a paragraph never ends on a full line.
    ///
    /// All lines are allocated before any byte moves, so on error the
    /// document is unchanged.
    pub fn cascade_forward(&mut self, start: LineId) -> Result<()> {
        if !self.line(start).is_full() {
            return Ok(());
        }

        let mut chain = vec![start];
        let mut terminal = start;
        while self.line(terminal).is_full() {
            match self.next_in_paragraph(terminal) {
                Some(next) => {
                    chain.push(next);
                    terminal = next;
                }
                None => break,
            }
        }

        let paragraph = self.paragraph_of(start);
        let overflow = if self.line(terminal).is_full() {
            Some(self.alloc_line(paragraph)?)
        } else {
            None
        };

        let receiver_len = match overflow {
            Some(_) => 1,
            None => self.line(terminal).len() + 1,
        };
        let receiver_is_last = overflow.is_some() || self.next_in_paragraph(terminal).is_none();
        let trailing = if receiver_len == self.capacity() && receiver_is_last {
            match self.alloc_line(paragraph) {
                Ok(id) => Some(id),
                Err(e) => {
                    if let Some(id) = overflow {
                        self.discard_line(id);
                    }
                    return Err(e);
                }
            }
        } else {
            None
        };

        if let Some(id) = overflow {
            self.link_line_after(terminal, id);
            chain.push(id);
        }
        if let Some(id) = trailing {
            let receiver = chain[chain.len() - 1];
            self.link_line_after(receiver, id);
        }

        for pair in chain.windows(2).rev() {
            let (from, to) = self.pair_mut(pair[0], pair[1]);
            let byte = from.pop_back().expect("full line has a last byte");
            to.push_front(byte);
        }

        debug!(
            line = self.line_number(start),
            shifted = chain.len() - 1,
            "cascaded forward"
        );
        Ok(())
    }

    /// Refill `start`, which was full before one of its bytes was deleted.
    ///
    /// The mirror of [`Document::cascade_forward`]: each line in the run
    /// pulls the first byte of its successor onto its right edge. A
    /// successor that was full continues the run; the first non-full
    /// successor donates and ends it. An emptied donor is removed unless a
    /// full line needs it as the paragraph's last line, and an empty last
    /// line left behind a line that is no longer full is removed too.
    pub fn cascade_backward(&mut self, start: LineId) {
        let mut current = start;
        let mut pulled = 0;

        while let Some(next) = self.next_in_paragraph(current) {
            if self.line(next).is_empty() {
                break;
            }
            let donor_was_full = self.line(next).is_full();
            {
                let (to, from) = self.pair_mut(current, next);
                let byte = from.pop_front().expect("non-empty line has a first byte");
                to.push_back(byte);
            }
            pulled += 1;

            if !donor_was_full {
                if self.line(next).is_empty() && self.next_in_paragraph(next).is_some() {
                    self.remove_line(next);
                }
                debug!(line = self.line_number(start), pulled, "cascaded backward");
                return;
            }
            current = next;
        }

        if let Some(next) = self.next_in_paragraph(current) {
            let is_last = self.next_in_paragraph(next).is_none();
            if is_last && self.line(next).is_empty() && !self.line(current).is_full() {
                self.remove_line(next);
            }
        }
        debug!(line = self.line_number(start), pulled, "cascaded backward");
    }
}
