use super::{Outcome, SessionController};
use crate::error::{ControlError, Result};
use crate::models::{ConfigOverrides, NotifyLevel};
use crate::services::BuiltinCommand;

fn present(path: Option<&str>) -> Option<&str> {
    path.map(str::trim).filter(|p| !p.is_empty())
}

impl SessionController {
    pub async fn add_file(&self, path: Option<&str>, overrides: &ConfigOverrides) -> Result<Outcome> {
        self.report(self.try_add_file(path, overrides))
    }

    fn try_add_file(&self, path: Option<&str>, overrides: &ConfigOverrides) -> Result<Outcome> {
        let path = present(path).ok_or(ControlError::MissingArgument("file path"))?;
        self.dispatch(BuiltinCommand::Add, Some(path), overrides)?;
        self.registry.add(path);
        Ok(Outcome::Sent)
    }

    /// One `/add` for the whole list, then a summary notice.
    pub async fn add_files(&self, paths: &[String], overrides: &ConfigOverrides) -> Result<Outcome> {
        let paths: Vec<&str> = paths.iter().filter_map(|p| present(Some(p.as_str()))).collect();

        match paths.as_slice() {
            [] => self.report(Err(ControlError::EmptyInput(
                "No files to add".to_string(),
            ))),
            [single] => self.add_file(Some(*single), overrides).await,
            many => {
                let result = self
                    .dispatch(BuiltinCommand::Add, Some(&many.join(" ")), overrides)
                    .map(|()| {
                        self.registry.add_all(many.iter().copied());
                        Outcome::Sent
                    });
                if result.is_ok() {
                    self.editor
                        .notify(&format!("Added {} files", many.len()), NotifyLevel::Info);
                }
                self.report(result)
            }
        }
    }

    /// Dropping a path that was never added is not an error.
    pub async fn drop_file(&self, path: Option<&str>, overrides: &ConfigOverrides) -> Result<Outcome> {
        self.report(self.try_drop_file(path, overrides))
    }

    fn try_drop_file(&self, path: Option<&str>, overrides: &ConfigOverrides) -> Result<Outcome> {
        let path = present(path).ok_or(ControlError::MissingArgument("file path"))?;
        self.dispatch(BuiltinCommand::Drop, Some(path), overrides)?;
        self.registry.remove(path);
        Ok(Outcome::Sent)
    }

    /// Share the current file for reference. Read-only files are not tracked.
    pub async fn add_read_only_file(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        let current = self.editor.current_file();
        let result = present(current.as_deref())
            .ok_or(ControlError::MissingArgument("current file path"))
            .and_then(|path| self.dispatch(BuiltinCommand::ReadOnly, Some(path), overrides))
            .map(|()| Outcome::Sent);
        self.report(result)
    }

    /// `/reset` drops every file on the assistant's side, so the registry follows.
    pub async fn reset_session(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        let result = self
            .dispatch(BuiltinCommand::Reset, None, overrides)
            .map(|()| {
                self.registry.clear();
                Outcome::Sent
            });
        self.report(result)
    }
}
