//! Services module
//! Everything the controller composes: the file registry, the command catalog,
//! the input resolver, the terminal session and its PTY backend, plus the
//! host collaborator traits.

pub mod catalog;
pub mod env;
pub mod host;
pub mod pty;
pub mod registry;
pub mod resolver;
pub mod terminal;

pub use catalog::{BuiltinCommand, Command, CommandCatalog, CommandDescriptor};
pub use host::{Editor, Picker};
pub use pty::{OutputSink, PtySpawner};
pub use registry::FileRegistry;
pub use terminal::{ProcessHandle, ProcessSpawner, TerminalSession, ToggleOutcome};
