//! aider-term
//! Control surface for an aider session running in a terminal next to the editor
//!
//! Module structure:
//! - commands: the Session Controller, one method per editor action
//! - services: file registry, command catalog, input resolver, terminal session, PTY backend
//! - models: shared data types (config, editor state, prompts, picker items)
//! - console: stdin/stdout host used by the `aider-term` binary

pub mod commands;
pub mod console;
pub mod error;
pub mod models;
pub mod services;

pub use commands::{Outcome, SessionController};
pub use error::{ControlError, Result};
pub use models::{ConfigOverrides, SessionConfig};
