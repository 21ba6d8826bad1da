//! PTY Service
//! Runs the assistant on a pseudo-terminal so it behaves exactly as it does in
//! a shell. Output is pumped to the host on a reader thread.

use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;

use crate::models::SessionConfig;
use crate::services::env;
use crate::services::terminal::{ProcessHandle, ProcessSpawner};

/// Receives raw output chunks from the assistant.
pub type OutputSink = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Spawns the assistant on a native PTY
pub struct PtySpawner {
    on_output: OutputSink,
}

impl PtySpawner {
    pub fn new(on_output: OutputSink) -> Self {
        Self { on_output }
    }
}

impl ProcessSpawner for PtySpawner {
    fn spawn(&self, config: &SessionConfig) -> Result<Box<dyn ProcessHandle>, String> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize {
                rows: config.rows,
                cols: config.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| format!("Failed to open PTY: {}", e))?;

        let mut cmd = CommandBuilder::new(&config.cmd);
        cmd.args(config.process_args());
        if let Some(cwd) = &config.cwd {
            cmd.cwd(cwd);
        }

        // Set environment variables for proper terminal
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");
        cmd.env("PATH", env::build_extended_path());
        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        // Take both ends before the child exists
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| format!("Failed to get PTY reader: {}", e))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| format!("Failed to get PTY writer: {}", e))?;

        let mut child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| format!("Failed to spawn {}: {}", config.cmd, e))?;
        // Only the child keeps the slave open, so the reader sees EOF when it exits
        drop(pair.slave);

        let on_output = self.on_output.clone();
        let reader_thread = thread::Builder::new()
            .name("aider-pty-reader".to_string())
            .spawn(move || {
                let mut buf = [0u8; 8192];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break, // EOF
                        Ok(n) => on_output(buf[..n].to_vec()),
                        Err(_) => break,
                    }
                }
                log::debug!("[Pty] Reader finished");
            });
        let reader_thread = match reader_thread {
            Ok(handle) => handle,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(format!("Failed to start PTY reader: {}", e));
            }
        };

        Ok(Box::new(PtyProcess {
            master: pair.master,
            writer,
            child,
            reader_thread: Some(reader_thread),
        }))
    }
}

struct PtyProcess {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    reader_thread: Option<thread::JoinHandle<()>>,
}

impl ProcessHandle for PtyProcess {
    fn write(&mut self, data: &[u8]) -> Result<(), String> {
        self.writer
            .write_all(data)
            .map_err(|e| format!("Failed to write to PTY: {}", e))?;
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush PTY: {}", e))
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), String> {
        self.master
            .resize(PtySize {
                rows,
                cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| format!("Failed to resize PTY: {}", e))
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn close(mut self: Box<Self>) {
        // Kill the whole process group: aider plus anything it started
        #[cfg(unix)]
        {
            if let Some(pid) = self.child.process_id() {
                unsafe {
                    libc::kill(-(pid as i32), libc::SIGTERM);
                    std::thread::sleep(std::time::Duration::from_millis(100));
                    libc::kill(-(pid as i32), libc::SIGKILL);
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = self.child.kill();
        }

        // Reap to prevent zombies
        let _ = self.child.wait();

        let PtyProcess {
            master,
            writer,
            reader_thread,
            ..
        } = *self;
        drop(writer);
        drop(master);
        if let Some(thread) = reader_thread {
            let _ = thread.join();
        }
        log::info!("[Pty] Assistant process closed");
    }
}
