use crate::models::NotifyLevel;

/// Everything a controller operation can report to the user.
///
/// Each variant is surfaced exactly once, as a notification, at the point it is
/// detected. `EmptyInput` and `NoDiagnostics` are informational.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("{0}")]
    EmptyInput(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Command registered twice: {0}")]
    DuplicateCommand(String),

    #[error("Failed to start assistant: {0}")]
    ProcessCreationFailed(String),

    #[error("Failed to write to assistant: {0}")]
    SendFailed(String),

    #[error("No diagnostics found for {0}")]
    NoDiagnostics(String),

    #[error("Invalid overrides: {0}")]
    InvalidOverrides(#[from] serde_json::Error),
}

impl ControlError {
    pub fn severity(&self) -> NotifyLevel {
        match self {
            ControlError::EmptyInput(_) | ControlError::NoDiagnostics(_) => NotifyLevel::Info,
            ControlError::MissingArgument(_)
            | ControlError::UnknownCommand(_)
            | ControlError::DuplicateCommand(_)
            | ControlError::ProcessCreationFailed(_)
            | ControlError::SendFailed(_)
            | ControlError::InvalidOverrides(_) => NotifyLevel::Error,
        }
    }

    pub fn is_informational(&self) -> bool {
        self.severity() == NotifyLevel::Info
    }
}

pub type Result<T> = std::result::Result<T, ControlError>;
