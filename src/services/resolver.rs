//! Input Resolver
//! Works out what the user means to send (selection, buffer, diagnostics,
//! typed text or a catalog command) and how a supplementary prompt combines
//! with it.

use crate::error::{ControlError, Result};
use crate::models::{Diagnostic, PromptRequest, PromptResponse};
use crate::services::catalog::Command;
use crate::services::host::Editor;

pub const DEFAULT_FILETYPE: &str = "text";

const SELECTION_PROMPT: &str = "Add a prompt to your selection (empty to skip):";
const BUFFER_PROMPT: &str = "Add a prompt to your buffer (empty to skip):";
const DIAGNOSTICS_PROMPT: &str = "Add a message to the diagnostics:";
const TYPED_PROMPT: &str = "Send text to Aider:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Command,
    Selection,
    Buffer,
    Diagnostics,
    Typed,
}

/// How submitted prompt text joins the base text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    /// `base\n> input`
    Append,
    /// `input\nbase`
    Prepend,
    /// The input is the whole payload.
    Replace,
    /// No prompt; the base is sent as-is.
    Verbatim,
}

/// What a send operation was invoked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRequest<'a> {
    /// Plain send, optionally with text from the caller.
    Text(Option<&'a str>),
    Buffer,
    Diagnostics,
}

/// Outcome of settling a resolution against the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Ready(String),
    /// Nothing to send.
    Empty,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub source: PayloadSource,
    pub text: String,
    /// Captured for buffer sends; not embedded in the payload.
    pub filetype: Option<String>,
    pub prompt: Option<PromptRequest>,
    combine: Combine,
}

impl Resolution {
    fn verbatim(source: PayloadSource, text: String) -> Self {
        Self {
            source,
            text,
            filetype: None,
            prompt: None,
            combine: Combine::Verbatim,
        }
    }

    /// Combine the base text with the prompt answer. `None` means no prompt
    /// was shown.
    pub fn finish(&self, response: Option<PromptResponse>) -> Payload {
        let input = match response {
            None => String::new(),
            Some(PromptResponse::Cancelled) => return Payload::Cancelled,
            Some(PromptResponse::Submitted(input)) => input,
        };
        let blank = input.is_empty();

        let text = match self.combine {
            Combine::Append if !blank => format!("{}\n> {}", self.text, input),
            Combine::Prepend if !blank => format!("{}\n{}", input, self.text),
            Combine::Replace => input,
            Combine::Append | Combine::Prepend | Combine::Verbatim => self.text.clone(),
        };

        if text.trim().is_empty() {
            Payload::Empty
        } else {
            Payload::Ready(text)
        }
    }
}

/// Rule 1: catalog command, with an optional caller-supplied argument.
/// Commands that need an argument and did not get one prompt for it.
pub fn resolve_command(command: &Command, argument: Option<&str>) -> Resolution {
    let argument = argument.map(str::trim).unwrap_or_default();
    match command {
        Command::ArgRequired(token) if argument.is_empty() => Resolution {
            source: PayloadSource::Command,
            text: String::new(),
            filetype: None,
            prompt: Some(PromptRequest::new(format!("{} ", token))),
            combine: Combine::Replace,
        },
        Command::ArgRequired(_) | Command::Fixed(_) => {
            Resolution::verbatim(PayloadSource::Command, argument.to_string())
        }
    }
}

/// Rules 2-5.
pub fn resolve(editor: &dyn Editor, request: SendRequest<'_>) -> Result<Resolution> {
    match request {
        SendRequest::Text(_) if editor.mode().is_visual() => Ok(Resolution {
            source: PayloadSource::Selection,
            text: editor.selected_lines().join("\n"),
            filetype: None,
            prompt: Some(PromptRequest::new(SELECTION_PROMPT)),
            combine: Combine::Append,
        }),
        SendRequest::Text(Some(text)) if !text.trim().is_empty() => {
            Ok(Resolution::verbatim(PayloadSource::Typed, text.to_string()))
        }
        SendRequest::Text(_) => Ok(Resolution {
            source: PayloadSource::Typed,
            text: String::new(),
            filetype: None,
            prompt: Some(PromptRequest::new(TYPED_PROMPT)),
            combine: Combine::Replace,
        }),
        SendRequest::Buffer => Ok(Resolution {
            source: PayloadSource::Buffer,
            text: editor.buffer_lines().join("\n"),
            filetype: Some(
                editor
                    .filetype()
                    .filter(|ft| !ft.is_empty())
                    .unwrap_or_else(|| DEFAULT_FILETYPE.to_string()),
            ),
            prompt: Some(PromptRequest::new(BUFFER_PROMPT)),
            combine: Combine::Append,
        }),
        SendRequest::Diagnostics => {
            let name = editor.buffer_name();
            let diagnostics = editor.diagnostics();
            if diagnostics.is_empty() {
                return Err(ControlError::NoDiagnostics(name));
            }
            Ok(Resolution {
                source: PayloadSource::Diagnostics,
                text: format_diagnostics(&diagnostics),
                filetype: None,
                prompt: Some(
                    PromptRequest::new(DIAGNOSTICS_PROMPT)
                        .with_default(format!("Here are the diagnostics for {}:", name)),
                ),
                combine: Combine::Prepend,
            })
        }
    }
}

/// Show the prompt (if any) and settle the payload.
pub async fn settle(editor: &dyn Editor, resolution: &Resolution) -> Payload {
    let response = match &resolution.prompt {
        Some(request) => Some(editor.prompt(request.clone()).await),
        None => None,
    };
    resolution.finish(response)
}

/// One line per diagnostic: `Line <n>: [<SEVERITY>] <message>`, 1-based lines.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("Line {}: [{}] {}", d.line + 1, d.severity.label(), d.message))
        .collect::<Vec<_>>()
        .join("\n")
}
