//! Host collaborators
//! The editor and the picker widget are provided by whatever embeds the
//! controller. Only their interface lives here.

use async_trait::async_trait;

use crate::models::{
    Diagnostic, EditorMode, NotifyLevel, PickerItem, PickerOptions, PromptRequest, PromptResponse,
};

#[async_trait]
pub trait Editor: Send + Sync {
    fn mode(&self) -> EditorMode;

    /// Selected lines in buffer order. Only meaningful in a visual mode.
    fn selected_lines(&self) -> Vec<String>;

    fn buffer_lines(&self) -> Vec<String>;

    fn buffer_name(&self) -> String;

    /// `None` when the host has no filetype for the buffer.
    fn filetype(&self) -> Option<String>;

    fn diagnostics(&self) -> Vec<Diagnostic>;

    /// Absolute path of the file in the current buffer, if it has one.
    fn current_file(&self) -> Option<String>;

    /// Absolute paths of every listed buffer backed by a file.
    fn open_buffers(&self) -> Vec<String>;

    /// Ask the user for text. Must not block the host's event loop.
    async fn prompt(&self, request: PromptRequest) -> PromptResponse;

    fn notify(&self, message: &str, level: NotifyLevel);
}

#[async_trait]
pub trait Picker: Send + Sync {
    /// Show the items; resolves with the chosen one, or `None` if dismissed.
    async fn pick(&self, options: &PickerOptions, items: Vec<PickerItem>) -> Option<PickerItem>;

    fn close(&self);
}
