//! Editor Commands
//!
//! Discrete edit commands, already decoded from key presses by the input
//! layer, and their dispatch onto an [`EditorState`].

use gapline_core::Result;
use tracing::debug;

use crate::cursor::Direction;
use crate::serializer::PARAGRAPH_DELIMITER;
use crate::state::EditorState;

/// Editor command type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Movement commands
    MoveCursor(Direction),

    // Edit commands
    InsertChar(u8),
    DeleteBackward,
    SplitParagraph,
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Whether the command changed the document or the cursor
    pub applied: bool,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            applied: true,
            message: None,
        }
    }

    /// The command hit a document boundary and did nothing
    pub fn noop(message: impl Into<String>) -> Self {
        Self {
            applied: false,
            message: Some(message.into()),
        }
    }
}

impl EditorState {
    /// Execute a command.
    ///
    /// Each command either completes or fails before touching the document;
    /// the only failure is running out of memory while creating a line or
    /// paragraph.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult> {
        debug!(?command, "execute");
        let result = match command {
            Command::MoveCursor(direction) => {
                if self.move_cursor(direction) {
                    CommandResult::ok()
                } else {
                    CommandResult::noop(match direction {
                        Direction::Up | Direction::Left => "Already at start of document",
                        Direction::Down | Direction::Right => "Already at end of document",
                    })
                }
            }

            Command::InsertChar(PARAGRAPH_DELIMITER) | Command::SplitParagraph => {
                self.split_paragraph()?;
                CommandResult::ok()
            }

            Command::InsertChar(byte) => {
                self.insert_char(byte)?;
                CommandResult::ok()
            }

            Command::DeleteBackward => {
                if self.delete_backward() {
                    CommandResult::ok()
                } else {
                    CommandResult::noop("Already at start of document")
                }
            }
        };
        Ok(result)
    }
}
