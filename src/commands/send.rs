use super::{Outcome, SessionController};
use crate::error::{ControlError, Result};
use crate::models::ConfigOverrides;
use crate::services::resolver::{self, Payload, Resolution, SendRequest};

impl SessionController {
    /// Visual selection (plus an optional note), the given text, or a typed prompt.
    pub async fn send_to_terminal(
        &self,
        text: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<Outcome> {
        self.send_resolved(SendRequest::Text(text), overrides, false)
            .await
    }

    /// Whole buffer plus an optional note, as the start of a new conversation.
    pub async fn send_buffer_with_prompt(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        self.send_resolved(SendRequest::Buffer, overrides, true).await
    }

    /// Diagnostics report for the current buffer, led by an optional message.
    pub async fn send_diagnostics_with_prompt(
        &self,
        overrides: &ConfigOverrides,
    ) -> Result<Outcome> {
        self.send_resolved(SendRequest::Diagnostics, overrides, false)
            .await
    }

    async fn send_resolved(
        &self,
        request: SendRequest<'_>,
        overrides: &ConfigOverrides,
        start_new_context: bool,
    ) -> Result<Outcome> {
        let resolution = self.report(resolver::resolve(self.editor.as_ref(), request))?;
        log::debug!("[Controller] Resolved {:?} payload", resolution.source);

        // Nothing below runs until the prompt has resolved
        let text = match resolver::settle(self.editor.as_ref(), &resolution).await {
            Payload::Ready(text) => text,
            Payload::Cancelled => {
                log::debug!("[Controller] Prompt cancelled, nothing sent");
                return Ok(Outcome::Cancelled);
            }
            Payload::Empty => {
                return self.report(Err(empty_payload(&resolution)));
            }
        };

        let result = self
            .terminal
            .send(&text, overrides, start_new_context)
            .map(|()| {
                self.sync_registry();
                Outcome::Sent
            });
        self.report(result)
    }
}

fn empty_payload(resolution: &Resolution) -> ControlError {
    ControlError::EmptyInput(format!(
        "Nothing to send from {}",
        match resolution.source {
            resolver::PayloadSource::Selection => "the selection",
            resolver::PayloadSource::Buffer => "the buffer",
            resolver::PayloadSource::Diagnostics => "the diagnostics",
            resolver::PayloadSource::Typed | resolver::PayloadSource::Command => "the prompt",
        }
    ))
}
