//! Console host
//! A minimal stand-in for an editor so the controller can be driven from a
//! plain terminal: one open file buffer, an optional line selection, prompts
//! and the command picker answered on stdin.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::commands::SessionController;
use crate::models::{
    ConfigOverrides, Diagnostic, EditorMode, NotifyLevel, PickerItem, PickerOptions,
    PromptRequest, PromptResponse,
};
use crate::services::{Editor, Picker};

const CANCEL: &str = ":cancel";
const NO_NAME: &str = "[No Name]";

pub const HELP: &str = "\
Actions:
  <text>                 send text to aider
  :send [text]           send text, the selection, or prompt for text
  :buffer                send the open buffer as a new conversation
  :diagnostics           send diagnostics for the open buffer
  :cmd <name> [arg]      run an aider command (e.g. :cmd ask why?)
  :picker                pick a command from the catalog
  :add <paths...>        add files to the chat
  :drop <path>           drop a file from the chat
  :read-only             add the open buffer read-only
  :reset                 drop all files and clear the chat
  :toggle [json]         show/hide aider, optionally with overrides
  :all-buffers           toggle with every open buffer as context
  :open <file>           open a file as the current buffer
  :select <from> <to>    select buffer lines (1-based, inclusive)
  :files                 list files shared with aider
  :help                  show this help
  :quit                  exit
Answer prompts on the next line; :cancel aborts.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(Option<String>),
    Buffer,
    Diagnostics,
    Command { name: String, argument: Option<String> },
    Picker,
    Add(Vec<String>),
    Drop(Option<String>),
    ReadOnly,
    Reset,
    Toggle(String),
    AllBuffers,
    Open(String),
    Select(usize, usize),
    Files,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn rest(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn parse_action(line: &str) -> Action {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Action::Empty;
    }
    let Some(directive) = line.strip_prefix(':') else {
        return Action::Send(Some(line.to_string()));
    };

    let (verb, args) = directive
        .trim()
        .split_once(char::is_whitespace)
        .unwrap_or((directive.trim(), ""));

    match verb {
        "send" => Action::Send(rest(args)),
        "buffer" => Action::Buffer,
        "diagnostics" => Action::Diagnostics,
        "cmd" => {
            let (name, argument) = args
                .trim()
                .split_once(char::is_whitespace)
                .unwrap_or((args.trim(), ""));
            if name.is_empty() {
                Action::Unknown(line.to_string())
            } else {
                Action::Command {
                    name: name.to_string(),
                    argument: rest(argument),
                }
            }
        }
        "picker" => Action::Picker,
        "add" => Action::Add(args.split_whitespace().map(str::to_string).collect()),
        "drop" => Action::Drop(rest(args)),
        "read-only" => Action::ReadOnly,
        "reset" => Action::Reset,
        "toggle" => Action::Toggle(args.trim().to_string()),
        "all-buffers" => Action::AllBuffers,
        "open" => match rest(args) {
            Some(path) => Action::Open(path),
            None => Action::Unknown(line.to_string()),
        },
        "select" => {
            let bounds: Vec<usize> = args
                .split_whitespace()
                .filter_map(|n| n.parse().ok())
                .collect();
            match bounds.as_slice() {
                [from, to] => Action::Select(*from, *to),
                [only] => Action::Select(*only, *only),
                _ => Action::Unknown(line.to_string()),
            }
        }
        "files" => Action::Files,
        "help" => Action::Help,
        "quit" | "q" => Action::Quit,
        _ => Action::Unknown(line.to_string()),
    }
}

#[derive(Debug, Default)]
struct BufferState {
    path: Option<PathBuf>,
    lines: Vec<String>,
    /// Zero-based, inclusive
    selection: Option<(usize, usize)>,
}

pub struct ConsoleHost<R> {
    input: tokio::sync::Mutex<Lines<R>>,
    buffer: Mutex<BufferState>,
}

impl ConsoleHost<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ConsoleHost<R> {
    pub fn new(reader: R) -> Self {
        Self {
            input: tokio::sync::Mutex::new(reader.lines()),
            buffer: Mutex::new(BufferState::default()),
        }
    }

    /// `None` at end of input.
    pub async fn next_line(&self) -> Option<String> {
        match self.input.lock().await.next_line().await {
            Ok(line) => line,
            Err(e) => {
                log::error!("[Console] Failed to read input: {}", e);
                None
            }
        }
    }

    /// Load a file as the current buffer.
    pub fn open(&self, path: &Path) -> std::io::Result<()> {
        let path = std::fs::canonicalize(path)?;
        let content = std::fs::read_to_string(&path)?;
        let mut buffer = self.buffer.lock();
        buffer.lines = content.lines().map(str::to_string).collect();
        buffer.path = Some(path);
        buffer.selection = None;
        Ok(())
    }

    /// Select 1-based inclusive lines. Returns false when out of range.
    pub fn select(&self, from: usize, to: usize) -> bool {
        let mut buffer = self.buffer.lock();
        let (from, to) = (from.min(to), from.max(to));
        if from == 0 || to > buffer.lines.len() {
            return false;
        }
        buffer.selection = Some((from - 1, to - 1));
        true
    }

    pub fn clear_selection(&self) {
        self.buffer.lock().selection = None;
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Editor for ConsoleHost<R> {
    fn mode(&self) -> EditorMode {
        if self.buffer.lock().selection.is_some() {
            EditorMode::VisualLine
        } else {
            EditorMode::Normal
        }
    }

    fn selected_lines(&self) -> Vec<String> {
        let buffer = self.buffer.lock();
        match buffer.selection {
            Some((from, to)) => buffer.lines[from..=to].to_vec(),
            None => Vec::new(),
        }
    }

    fn buffer_lines(&self) -> Vec<String> {
        self.buffer.lock().lines.clone()
    }

    fn buffer_name(&self) -> String {
        self.buffer
            .lock()
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| NO_NAME.to_string())
    }

    fn filetype(&self) -> Option<String> {
        self.buffer
            .lock()
            .path
            .as_ref()
            .and_then(|p| p.extension())
            .map(|ext| ext.to_string_lossy().into_owned())
    }

    /// The console has no language server attached.
    fn diagnostics(&self) -> Vec<Diagnostic> {
        Vec::new()
    }

    fn current_file(&self) -> Option<String> {
        self.buffer
            .lock()
            .path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
    }

    fn open_buffers(&self) -> Vec<String> {
        self.current_file().into_iter().collect()
    }

    async fn prompt(&self, request: PromptRequest) -> PromptResponse {
        match &request.default {
            Some(default) => eprint!("{} [{}] ", request.label, default),
            None => eprint!("{} ", request.label),
        }

        match self.next_line().await {
            None => PromptResponse::Cancelled,
            Some(line) if line.trim() == CANCEL => PromptResponse::Cancelled,
            Some(line) if line.is_empty() => {
                PromptResponse::Submitted(request.default.unwrap_or_default())
            }
            Some(line) => PromptResponse::Submitted(line),
        }
    }

    fn notify(&self, message: &str, level: NotifyLevel) {
        let tag = match level {
            NotifyLevel::Debug => "debug",
            NotifyLevel::Info => "info",
            NotifyLevel::Warn => "warn",
            NotifyLevel::Error => "error",
        };
        eprintln!("[aider-term] {}: {}", tag, message);
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Picker for ConsoleHost<R> {
    async fn pick(&self, options: &PickerOptions, items: Vec<PickerItem>) -> Option<PickerItem> {
        eprintln!("{}", options.title);
        for (i, item) in items.iter().enumerate() {
            eprintln!("  {:>2}. {:<12} {}", i + 1, item.text, item.description);
        }
        eprint!("Pick a command (number or name): ");

        let line = self.next_line().await?;
        let choice = line.trim();
        if choice.is_empty() || choice == CANCEL {
            return None;
        }
        match choice.parse::<usize>() {
            Ok(n) if n >= 1 => items.into_iter().nth(n - 1),
            Ok(_) => None,
            Err(_) => items.into_iter().find(|item| item.text == choice),
        }
    }

    fn close(&self) {
        log::debug!("[Console] Picker closed");
    }
}

/// Run one console action. Returns false when the user asked to quit.
pub async fn run_action<R>(
    controller: &SessionController,
    host: &ConsoleHost<R>,
    action: Action,
) -> bool
where
    R: AsyncBufRead + Unpin + Send,
{
    let none = ConfigOverrides::default();

    // Controller errors are already shown to the user
    let _ = match action {
        Action::Send(text) => controller.send_to_terminal(text.as_deref(), &none).await,
        Action::Buffer => controller.send_buffer_with_prompt(&none).await,
        Action::Diagnostics => controller.send_diagnostics_with_prompt(&none).await,
        Action::Command { name, argument } => {
            controller
                .send_command(&name, argument.as_deref(), &none)
                .await
        }
        Action::Picker => controller.open_command_picker(&none).await,
        Action::Add(paths) => controller.add_files(&paths, &none).await,
        Action::Drop(path) => controller.drop_file(path.as_deref(), &none).await,
        Action::ReadOnly => controller.add_read_only_file(&none).await,
        Action::Reset => controller.reset_session(&none).await,
        Action::Toggle(json) => match ConfigOverrides::from_json(&json) {
            Ok(overrides) => controller.toggle(&overrides).await,
            Err(e) => {
                host.notify(&e.to_string(), e.severity());
                Err(e)
            }
        },
        Action::AllBuffers => controller.toggle_with_all_buffers(&none).await,
        Action::Open(path) => {
            if let Err(e) = host.open(Path::new(&path)) {
                host.notify(&format!("Failed to open {}: {}", path, e), NotifyLevel::Error);
            }
            return true;
        }
        Action::Select(from, to) => {
            if !host.select(from, to) {
                host.notify(&format!("No lines {}-{} in buffer", from, to), NotifyLevel::Warn);
            }
            return true;
        }
        Action::Files => {
            let files = controller.tracked_files();
            if files.is_empty() {
                eprintln!("No files shared with aider");
            }
            for file in files {
                eprintln!("  {}", file);
            }
            return true;
        }
        Action::Help => {
            eprintln!("{}", HELP);
            return true;
        }
        Action::Quit => return false,
        Action::Empty => return true,
        Action::Unknown(line) => {
            host.notify(&format!("Unknown action: {} (:help)", line), NotifyLevel::Warn);
            return true;
        }
    };

    // Leaving visual mode after an action, like an editor does
    host.clear_selection();
    true
}
