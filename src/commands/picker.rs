use super::{Outcome, SessionController};
use crate::error::Result;
use crate::models::{ConfigOverrides, PickerOptions};
use crate::services::resolver::{self, Payload};
use crate::services::{BuiltinCommand, Command};

impl SessionController {
    /// Let the user pick a catalog command. Input-requiring commands prompt
    /// for their argument after the picker has closed.
    pub async fn open_command_picker(&self, overrides: &ConfigOverrides) -> Result<Outcome> {
        let choice = self
            .picker
            .pick(&PickerOptions::default(), self.catalog.picker_items())
            .await;
        self.picker.close();

        match choice {
            Some(item) => self.send_command(&item.text, None, overrides).await,
            None => {
                log::debug!("[Controller] Picker dismissed");
                Ok(Outcome::Cancelled)
            }
        }
    }

    /// Dispatch a catalog command by name.
    pub async fn send_command(
        &self,
        name: &str,
        argument: Option<&str>,
        overrides: &ConfigOverrides,
    ) -> Result<Outcome> {
        let command: Command = self.report(self.catalog.lookup(name))?.command.clone();
        let resolution = resolver::resolve_command(&command, argument);

        let argument = match resolver::settle(self.editor.as_ref(), &resolution).await {
            Payload::Ready(argument) => Some(argument),
            Payload::Empty => None,
            Payload::Cancelled => {
                log::debug!("[Controller] Prompt for {} cancelled", command.token());
                return Ok(Outcome::Cancelled);
            }
        };

        let result = self
            .terminal
            .command(command.token(), argument.as_deref(), overrides)
            .map(|()| {
                self.sync_registry();
                self.mirror_membership(name, argument.as_deref());
                Outcome::Sent
            });
        self.report(result)
    }

    /// Keep the registry in step when add/drop/reset go out by name. A bare
    /// `/drop` drops every file.
    fn mirror_membership(&self, name: &str, argument: Option<&str>) {
        let paths = argument.unwrap_or_default().split_whitespace();
        match (BuiltinCommand::from_name(name), argument) {
            (Some(BuiltinCommand::Add), _) => self.registry.add_all(paths),
            (Some(BuiltinCommand::Drop), Some(_)) => paths.for_each(|path| {
                self.registry.remove(path);
            }),
            (Some(BuiltinCommand::Drop), None) | (Some(BuiltinCommand::Reset), _) => {
                self.registry.clear()
            }
            _ => {}
        }
    }
}
