//! Gapline Editor
//!
//! In-memory text editing engine:
//! - Fixed-capacity gap buffer lines chained into paragraphs
//! - Cascading reflow when a full line overflows or underflows
//! - Cursor navigation with a remembered column for vertical moves
//! - Viewport tracking and a byte-level load/save format

mod arena;
pub mod commands;
pub mod cursor;
pub mod document;
pub mod gap_line;
pub mod reflow;
pub mod render;
pub mod serializer;
pub mod state;
pub mod viewport;

pub use commands::{Command, CommandResult};
pub use cursor::{Cursor, Direction};
pub use document::{Document, LineId, ParagraphId};
pub use gap_line::GapLine;
pub use render::{ScreenPosition, VisibleLine};
pub use state::EditorState;
pub use viewport::Viewport;
