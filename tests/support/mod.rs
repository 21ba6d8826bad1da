#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use aider_term_lib::models::{
    Diagnostic, EditorMode, NotifyLevel, PickerItem, PickerOptions, PromptRequest, PromptResponse,
    SessionConfig,
};
use aider_term_lib::services::{Editor, Picker, ProcessHandle, ProcessSpawner};
use aider_term_lib::SessionController;

pub enum Answer {
    Now(PromptResponse),
    /// Resolves when the test sends on the paired channel.
    Later(oneshot::Receiver<PromptResponse>),
}

pub struct EditorTrace {
    pub mode: EditorMode,
    pub selection: Vec<String>,
    pub buffer: Vec<String>,
    pub buffer_name: String,
    pub filetype: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub current_file: Option<String>,
    pub open_buffers: Vec<String>,
    pub answers: VecDeque<Answer>,
    pub prompts: Vec<PromptRequest>,
    pub notifications: Vec<(NotifyLevel, String)>,
}

impl Default for EditorTrace {
    fn default() -> Self {
        Self {
            mode: EditorMode::Normal,
            selection: Vec::new(),
            buffer: Vec::new(),
            buffer_name: "main.rs".to_string(),
            filetype: Some("rust".to_string()),
            diagnostics: Vec::new(),
            current_file: None,
            open_buffers: Vec::new(),
            answers: VecDeque::new(),
            prompts: Vec::new(),
            notifications: Vec::new(),
        }
    }
}

impl EditorTrace {
    pub fn answer(&mut self, text: &str) {
        self.answers
            .push_back(Answer::Now(PromptResponse::Submitted(text.to_string())));
    }

    pub fn cancel_next_prompt(&mut self) {
        self.answers.push_back(Answer::Now(PromptResponse::Cancelled));
    }

    pub fn answer_later(&mut self) -> oneshot::Sender<PromptResponse> {
        let (tx, rx) = oneshot::channel();
        self.answers.push_back(Answer::Later(rx));
        tx
    }

    pub fn select(&mut self, lines: &[&str]) {
        self.mode = EditorMode::VisualLine;
        self.selection = lines.iter().map(|l| l.to_string()).collect();
    }
}

pub struct ScriptedEditor {
    state: Arc<Mutex<EditorTrace>>,
}

#[async_trait]
impl Editor for ScriptedEditor {
    fn mode(&self) -> EditorMode {
        self.state.lock().mode
    }

    fn selected_lines(&self) -> Vec<String> {
        self.state.lock().selection.clone()
    }

    fn buffer_lines(&self) -> Vec<String> {
        self.state.lock().buffer.clone()
    }

    fn buffer_name(&self) -> String {
        self.state.lock().buffer_name.clone()
    }

    fn filetype(&self) -> Option<String> {
        self.state.lock().filetype.clone()
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        self.state.lock().diagnostics.clone()
    }

    fn current_file(&self) -> Option<String> {
        self.state.lock().current_file.clone()
    }

    fn open_buffers(&self) -> Vec<String> {
        self.state.lock().open_buffers.clone()
    }

    async fn prompt(&self, request: PromptRequest) -> PromptResponse {
        let answer = {
            let mut state = self.state.lock();
            state.prompts.push(request.clone());
            state.answers.pop_front()
        };
        match answer {
            Some(Answer::Now(response)) => response,
            Some(Answer::Later(rx)) => rx.await.unwrap_or(PromptResponse::Cancelled),
            None => panic!("unexpected prompt: {}", request.label),
        }
    }

    fn notify(&self, message: &str, level: NotifyLevel) {
        self.state
            .lock()
            .notifications
            .push((level, message.to_string()));
    }
}

#[derive(Default)]
pub struct PickerTrace {
    /// Name of the item to choose; `None` dismisses the picker.
    pub choice: Option<String>,
    pub shown: Vec<(PickerOptions, Vec<PickerItem>)>,
    pub closed: usize,
}

pub struct ScriptedPicker {
    state: Arc<Mutex<PickerTrace>>,
}

#[async_trait]
impl Picker for ScriptedPicker {
    async fn pick(&self, options: &PickerOptions, items: Vec<PickerItem>) -> Option<PickerItem> {
        let mut state = self.state.lock();
        state.shown.push((options.clone(), items.clone()));
        let choice = state.choice.clone()?;
        items.into_iter().find(|item| item.text == choice)
    }

    fn close(&self) {
        self.state.lock().closed += 1;
    }
}

#[derive(Default)]
pub struct ProcessTrace {
    pub spawns: Vec<SessionConfig>,
    pub writes: Vec<String>,
    pub closed: usize,
    pub fail_spawn: Option<String>,
    pub exited: bool,
    /// Held inside `spawn` to widen race windows.
    pub spawn_delay: Option<Duration>,
}

pub struct RecordingSpawner {
    state: Arc<Mutex<ProcessTrace>>,
}

impl ProcessSpawner for RecordingSpawner {
    fn spawn(&self, config: &SessionConfig) -> Result<Box<dyn ProcessHandle>, String> {
        let delay = self.state.lock().spawn_delay;
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        let mut state = self.state.lock();
        if let Some(reason) = &state.fail_spawn {
            return Err(reason.clone());
        }
        state.spawns.push(config.clone());
        state.exited = false;
        Ok(Box::new(RecordingProcess {
            state: Arc::clone(&self.state),
        }))
    }
}

struct RecordingProcess {
    state: Arc<Mutex<ProcessTrace>>,
}

impl ProcessHandle for RecordingProcess {
    fn write(&mut self, data: &[u8]) -> Result<(), String> {
        self.state
            .lock()
            .writes
            .push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }

    fn resize(&mut self, _cols: u16, _rows: u16) -> Result<(), String> {
        Ok(())
    }

    fn is_alive(&mut self) -> bool {
        !self.state.lock().exited
    }

    fn close(self: Box<Self>) {
        self.state.lock().closed += 1;
    }
}

pub struct Harness {
    pub controller: SessionController,
    pub editor: Arc<Mutex<EditorTrace>>,
    pub picker: Arc<Mutex<PickerTrace>>,
    pub process: Arc<Mutex<ProcessTrace>>,
}

pub fn harness() -> Harness {
    harness_with(SessionConfig::default())
}

pub fn harness_with(config: SessionConfig) -> Harness {
    let editor = Arc::new(Mutex::new(EditorTrace::default()));
    let picker = Arc::new(Mutex::new(PickerTrace::default()));
    let process = Arc::new(Mutex::new(ProcessTrace::default()));

    let controller = SessionController::new(
        config,
        Arc::new(ScriptedEditor {
            state: Arc::clone(&editor),
        }),
        Arc::new(ScriptedPicker {
            state: Arc::clone(&picker),
        }),
        Arc::new(RecordingSpawner {
            state: Arc::clone(&process),
        }),
    )
    .expect("controller");

    Harness {
        controller,
        editor,
        picker,
        process,
    }
}

impl Harness {
    pub fn writes(&self) -> Vec<String> {
        self.process.lock().writes.clone()
    }

    /// Writes with the submit key and paste markers stripped.
    pub fn delivered(&self) -> Vec<String> {
        self.writes()
            .iter()
            .map(|w| {
                w.trim_end_matches('\r')
                    .trim_start_matches("\x1b[200~")
                    .trim_end_matches("\x1b[201~")
                    .to_string()
            })
            .collect()
    }

    pub fn spawn_count(&self) -> usize {
        self.process.lock().spawns.len()
    }

    pub fn notifications(&self) -> Vec<(NotifyLevel, String)> {
        self.editor.lock().notifications.clone()
    }

    pub fn prompts(&self) -> Vec<PromptRequest> {
        self.editor.lock().prompts.clone()
    }
}
