//! Models module
//! Shared data types passed between the editor host, the controller and the
//! terminal session. Everything here is plain data and (de)serializable.

pub mod config;
pub mod editor;

pub use config::{merge, ConfigOverrides, CustomCommand, SessionConfig};
pub use editor::{
    Diagnostic, DiagnosticSeverity, EditorMode, NotifyLevel, PickerCategory, PickerItem,
    PickerOptions, PromptRequest, PromptResponse,
};
