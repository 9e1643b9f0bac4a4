//! Gapline - a gap buffer text editing engine
//!
//! Text is stored as paragraphs of fixed-capacity lines, each line a gap
//! buffer as wide as the display. Typing into a full line cascades the
//! overflow into the lines below it, deleting pulls bytes back up.
//!
//! ## Architecture
//!
//! - `gapline-core`: Error type and configuration
//! - `gapline-editor`: Lines, paragraphs, reflow, cursor, viewport and file I/O
//! - `commands`: Scripted sessions for the command-line front end

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use gapline_core as core;
pub use gapline_editor as editor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use gapline_core::{AppConfig, GaplineError};
    pub use gapline_editor::{Command, CommandResult, Direction, EditorState};
}
