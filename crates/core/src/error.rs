//! Error types for Gapline
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for Gapline
#[derive(Error, Debug)]
pub enum GaplineError {
    /// A line or paragraph could not be allocated. The engine cannot go on
    /// without the structural unit it was about to create.
    #[error("Out of memory while allocating {what}")]
    OutOfMemory { what: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid line capacity: {0}")]
    InvalidCapacity(usize),
}

/// Result type alias for Gapline operations
pub type Result<T> = std::result::Result<T, GaplineError>;

impl GaplineError {
    /// Shorthand for an allocation failure of `what`
    pub fn out_of_memory(what: &'static str) -> Self {
        GaplineError::OutOfMemory { what }
    }

    /// Check if this error is recoverable.
    ///
    /// I/O failures leave the in-memory document as it was, so the session
    /// can continue. Running out of memory mid-edit cannot be recovered.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, GaplineError::Io(_) | GaplineError::Config(_))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            GaplineError::Io(e) => format!("File operation failed: {}", e),
            GaplineError::Config(msg) => format!("Configuration error: {}", msg),
            GaplineError::OutOfMemory { what } => {
                format!("Out of memory: could not allocate {}", what)
            }
            GaplineError::InvalidCapacity(width) => {
                format!("Display width {} leaves no room for text", width)
            }
            _ => self.to_string(),
        }
    }
}
