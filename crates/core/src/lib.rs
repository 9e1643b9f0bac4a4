//! Gapline Core - shared types
//!
//! Error handling and configuration shared by the editing engine and
//! the command-line front end.

pub mod config;
pub mod error;

pub use config::{AppConfig, DisplayConfig, LoggingConfig};
pub use error::{GaplineError, Result};

/// Gapline version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Gapline";
