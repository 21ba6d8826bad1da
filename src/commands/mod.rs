//! Commands module
//! The Session Controller: every action an editor can invoke. Each operation
//! resolves input, awaits any prompt, then writes to the terminal session and
//! updates the file registry. Failures are reported to the editor once, where
//! they are detected, and returned to the caller.

mod files;
mod picker;
mod send;

use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::{ControlError, Result};
use crate::models::{ConfigOverrides, SessionConfig};
use crate::services::{
    BuiltinCommand, CommandCatalog, Editor, FileRegistry, Picker, ProcessSpawner, TerminalSession,
    ToggleOutcome,
};

/// What an operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Text or a command line was written to the assistant.
    Sent,
    /// The user dismissed a prompt or the picker; nothing was written.
    Cancelled,
    Toggled(ToggleOutcome),
}

pub struct SessionController {
    editor: Arc<dyn Editor>,
    picker: Arc<dyn Picker>,
    terminal: TerminalSession,
    registry: FileRegistry,
    /// Terminal generation the registry describes
    registry_generation: Mutex<u64>,
    catalog: CommandCatalog,
}

impl SessionController {
    /// The catalog is loaded once here, from the built-ins plus `config.commands`.
    pub fn new(
        config: SessionConfig,
        editor: Arc<dyn Editor>,
        picker: Arc<dyn Picker>,
        spawner: Arc<dyn ProcessSpawner>,
    ) -> Result<Self> {
        let catalog = CommandCatalog::with_custom(&config.commands)?;
        Ok(Self {
            editor,
            picker,
            terminal: TerminalSession::new(config, spawner),
            registry: FileRegistry::new(),
            registry_generation: Mutex::new(0),
            catalog,
        })
    }

    pub fn terminal(&self) -> &TerminalSession {
        &self.terminal
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Files currently shared with the assistant, sorted.
    pub fn tracked_files(&self) -> Vec<String> {
        self.registry.paths()
    }

    pub async fn toggle(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        let result = self.terminal.toggle(overrides).map(|outcome| {
            self.sync_registry();
            Outcome::Toggled(outcome)
        });
        self.report(result)
    }

    /// Toggle with every open file buffer shared as context.
    pub async fn toggle_with_all_buffers(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        let files: Vec<String> = self
            .editor
            .open_buffers()
            .into_iter()
            .filter(|path| !path.trim().is_empty())
            .collect();

        if files.is_empty() {
            // Still toggle; the notice only says nothing was shared
            let _ = self.report::<()>(Err(ControlError::EmptyInput(
                "No file buffers to share".to_string(),
            )));
            return self.toggle(overrides).await;
        }

        let managed = overrides.with_managed_files(files.clone());
        let result = self.terminal.toggle(&managed).and_then(|outcome| {
            self.sync_registry();
            if outcome != ToggleOutcome::Created {
                let untracked: Vec<&str> = files
                    .iter()
                    .map(String::as_str)
                    .filter(|path| !self.registry.contains(path))
                    .collect();
                if !untracked.is_empty() {
                    self.dispatch(BuiltinCommand::Add, Some(&untracked.join(" ")), &managed)?;
                }
            }
            self.registry.add_all(files.iter().cloned());
            Ok(Outcome::Toggled(outcome))
        });
        self.report(result)
    }

    /// Terminate the assistant. Its files go with it.
    pub fn shutdown(&self) {
        self.terminal.close();
        self.registry.clear();
    }

    fn dispatch(
        &self,
        command: BuiltinCommand,
        argument: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<()> {
        self.terminal.command(command.token(), argument, overrides)?;
        self.sync_registry();
        Ok(())
    }

    /// Forget tracked files once a new process has replaced the one they
    /// were added to. Call after every successful terminal operation and
    /// before touching the registry.
    fn sync_registry(&self) {
        let current = self.terminal.generation();
        let mut seen = self.registry_generation.lock();
        if *seen != current {
            if !self.registry.is_empty() {
                log::info!("[Controller] New assistant process, clearing tracked files");
                self.registry.clear();
            }
            *seen = current;
        }
    }

    /// Surface an error as a single notification.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_informational() {
                log::info!("[Controller] {}", err);
            } else {
                log::error!("[Controller] {}", err);
            }
            self.editor.notify(&err.to_string(), err.severity());
        }
        result
    }
}
