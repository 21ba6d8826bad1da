//! Terminal Session
//! Owns the assistant process: lazy creation, visibility, and the only two
//! ways to write to it (plain text and `<token> [argument]` command lines).

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{ControlError, Result};
use crate::models::{merge, ConfigOverrides, SessionConfig};

const SUBMIT: &str = "\r";
const PASTE_START: &str = "\x1b[200~";
const PASTE_END: &str = "\x1b[201~";

/// A running assistant process
pub trait ProcessHandle: Send {
    fn write(&mut self, data: &[u8]) -> std::result::Result<(), String>;

    fn resize(&mut self, cols: u16, rows: u16) -> std::result::Result<(), String>;

    /// False once the process has exited.
    fn is_alive(&mut self) -> bool;

    fn close(self: Box<Self>);
}

/// Starts assistant processes
pub trait ProcessSpawner: Send + Sync {
    fn spawn(&self, config: &SessionConfig) -> std::result::Result<Box<dyn ProcessHandle>, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Created,
    Shown,
    Hidden,
}

struct LiveSession {
    handle: Box<dyn ProcessHandle>,
    visible: bool,
    config: SessionConfig,
}

impl LiveSession {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut data = String::with_capacity(line.len() + SUBMIT.len());
        data.push_str(line);
        data.push_str(SUBMIT);
        self.handle
            .write(data.as_bytes())
            .map_err(ControlError::SendFailed)
    }
}

/// At most one live process. Every path that can create it goes through the
/// same lock, so concurrent callers share the first caller's handle.
pub struct TerminalSession {
    base: SessionConfig,
    spawner: Arc<dyn ProcessSpawner>,
    session: Mutex<Option<LiveSession>>,
    generation: AtomicU64,
}

impl TerminalSession {
    pub fn new(base: SessionConfig, spawner: Arc<dyn ProcessSpawner>) -> Self {
        Self {
            base,
            spawner,
            session: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    pub fn base_config(&self) -> &SessionConfig {
        &self.base
    }

    /// Create and show, or flip visibility of the existing session.
    pub fn toggle(&self, overrides: &ConfigOverrides) -> Result<ToggleOutcome> {
        let mut slot = self.session.lock();
        let created = self.ensure(&mut slot, overrides)?;
        let Some(live) = slot.as_mut() else {
            return Err(ControlError::ProcessCreationFailed(
                "session vanished after creation".to_string(),
            ));
        };

        if created {
            return Ok(ToggleOutcome::Created);
        }

        if !overrides.is_empty() {
            live.config = merge(&self.base, overrides);
            log::debug!("[Terminal] Refreshed config snapshot");
        }
        live.visible = !live.visible;
        log::info!(
            "[Terminal] {}",
            if live.visible { "Shown" } else { "Hidden" }
        );
        Ok(if live.visible {
            ToggleOutcome::Shown
        } else {
            ToggleOutcome::Hidden
        })
    }

    /// Write `text` as one submitted message. A new context is started by
    /// writing the configured new-context command first.
    pub fn send(
        &self,
        text: &str,
        overrides: &ConfigOverrides,
        start_new_context: bool,
    ) -> Result<()> {
        let mut slot = self.session.lock();
        self.ensure(&mut slot, overrides)?;
        let Some(live) = slot.as_mut() else {
            return Err(ControlError::SendFailed("No assistant session".to_string()));
        };

        if start_new_context && !live.config.new_context_command.is_empty() {
            let reset = live.config.new_context_command.clone();
            live.write_line(&reset)?;
        }

        let payload = encode_text(text, live.config.bracketed_paste);
        live.write_line(&payload)?;
        log::info!(
            "[Terminal] Sent {} bytes{}",
            text.len(),
            if start_new_context { " (new context)" } else { "" }
        );
        Ok(())
    }

    /// Write `<token>` or `<token> <argument>` as one line.
    pub fn command(
        &self,
        token: &str,
        argument: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<()> {
        let mut slot = self.session.lock();
        self.ensure(&mut slot, overrides)?;
        let Some(live) = slot.as_mut() else {
            return Err(ControlError::SendFailed("No assistant session".to_string()));
        };

        live.write_line(&command_line(token, argument))?;
        log::info!("[Terminal] Dispatched {}", token);
        Ok(())
    }

    pub fn resize(&self, cols: u16, rows: u16) -> Result<()> {
        let mut slot = self.session.lock();
        if let Some(ref mut live) = *slot {
            live.handle
                .resize(cols, rows)
                .map_err(ControlError::SendFailed)?;
            live.config.cols = cols;
            live.config.rows = rows;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.session
            .lock()
            .as_ref()
            .map(|live| live.visible)
            .unwrap_or(false)
    }

    /// Config the live session was created (or last re-toggled) with
    pub fn config(&self) -> Option<SessionConfig> {
        self.session.lock().as_ref().map(|live| live.config.clone())
    }

    /// Number of processes started so far. A change means the assistant
    /// behind this session is a fresh one with no files loaded.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Terminate the process, if any.
    pub fn close(&self) {
        let live = self.session.lock().take();
        if let Some(live) = live {
            log::info!("[Terminal] Closing assistant session");
            live.handle.close();
        }
    }

    /// Make sure `slot` holds a live session. Returns true if one was created.
    fn ensure(&self, slot: &mut Option<LiveSession>, overrides: &ConfigOverrides) -> Result<bool> {
        if let Some(mut stale) = slot.take() {
            if stale.handle.is_alive() {
                *slot = Some(stale);
                return Ok(false);
            }
            log::warn!("[Terminal] Assistant process exited, starting a new one");
            stale.handle.close();
        }

        let config = merge(&self.base, overrides);
        let handle = self.spawner.spawn(&config).map_err(|e| {
            log::error!("[Terminal] Failed to start {}: {}", config.cmd, e);
            ControlError::ProcessCreationFailed(e)
        })?;
        log::info!("[Terminal] Started {} {}", config.cmd, config.process_args().join(" "));

        *slot = Some(LiveSession {
            handle,
            visible: true,
            config,
        });
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// `<token>` or `<token> <argument>`
pub fn command_line(token: &str, argument: Option<&str>) -> String {
    match argument.map(str::trim).filter(|a| !a.is_empty()) {
        Some(argument) => format!("{} {}", token, argument),
        None => token.to_string(),
    }
}

fn encode_text(text: &str, bracketed_paste: bool) -> String {
    if bracketed_paste && text.contains('\n') {
        format!("{}{}{}", PASTE_START, text, PASTE_END)
    } else {
        text.to_string()
    }
}
