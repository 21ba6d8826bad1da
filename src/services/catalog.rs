//! Command Catalog
//! Maps command names to the slash token sent to the assistant. Built-in
//! commands are a closed enum; user entries from config build a `Command`
//! at load time and are looked up by name.

use crate::error::{ControlError, Result};
use crate::models::{CustomCommand, PickerCategory, PickerItem};

/// What gets written to the assistant, and whether it needs an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Fixed(String),
    ArgRequired(String),
}

impl Command {
    pub fn new(token: impl Into<String>, requires_input: bool) -> Self {
        let token = token.into();
        if requires_input {
            Command::ArgRequired(token)
        } else {
            Command::Fixed(token)
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Command::Fixed(token) | Command::ArgRequired(token) => token,
        }
    }

    pub fn requires_input(&self) -> bool {
        matches!(self, Command::ArgRequired(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinCommand {
    Add,
    Architect,
    Ask,
    Clear,
    Code,
    Commit,
    Diff,
    Drop,
    Exit,
    Git,
    Help,
    Lint,
    Ls,
    Map,
    MapRefresh,
    Model,
    Paste,
    ReadOnly,
    Reset,
    Run,
    Test,
    Tokens,
    Undo,
    Web,
}

impl BuiltinCommand {
    pub const ALL: [BuiltinCommand; 24] = [
        BuiltinCommand::Add,
        BuiltinCommand::Architect,
        BuiltinCommand::Ask,
        BuiltinCommand::Clear,
        BuiltinCommand::Code,
        BuiltinCommand::Commit,
        BuiltinCommand::Diff,
        BuiltinCommand::Drop,
        BuiltinCommand::Exit,
        BuiltinCommand::Git,
        BuiltinCommand::Help,
        BuiltinCommand::Lint,
        BuiltinCommand::Ls,
        BuiltinCommand::Map,
        BuiltinCommand::MapRefresh,
        BuiltinCommand::Model,
        BuiltinCommand::Paste,
        BuiltinCommand::ReadOnly,
        BuiltinCommand::Reset,
        BuiltinCommand::Run,
        BuiltinCommand::Test,
        BuiltinCommand::Tokens,
        BuiltinCommand::Undo,
        BuiltinCommand::Web,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name.trim())
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinCommand::Add => "add",
            BuiltinCommand::Architect => "architect",
            BuiltinCommand::Ask => "ask",
            BuiltinCommand::Clear => "clear",
            BuiltinCommand::Code => "code",
            BuiltinCommand::Commit => "commit",
            BuiltinCommand::Diff => "diff",
            BuiltinCommand::Drop => "drop",
            BuiltinCommand::Exit => "exit",
            BuiltinCommand::Git => "git",
            BuiltinCommand::Help => "help",
            BuiltinCommand::Lint => "lint",
            BuiltinCommand::Ls => "ls",
            BuiltinCommand::Map => "map",
            BuiltinCommand::MapRefresh => "map-refresh",
            BuiltinCommand::Model => "model",
            BuiltinCommand::Paste => "paste",
            BuiltinCommand::ReadOnly => "read-only",
            BuiltinCommand::Reset => "reset",
            BuiltinCommand::Run => "run",
            BuiltinCommand::Test => "test",
            BuiltinCommand::Tokens => "tokens",
            BuiltinCommand::Undo => "undo",
            BuiltinCommand::Web => "web",
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            BuiltinCommand::Add => "/add",
            BuiltinCommand::Architect => "/architect",
            BuiltinCommand::Ask => "/ask",
            BuiltinCommand::Clear => "/clear",
            BuiltinCommand::Code => "/code",
            BuiltinCommand::Commit => "/commit",
            BuiltinCommand::Diff => "/diff",
            BuiltinCommand::Drop => "/drop",
            BuiltinCommand::Exit => "/exit",
            BuiltinCommand::Git => "/git",
            BuiltinCommand::Help => "/help",
            BuiltinCommand::Lint => "/lint",
            BuiltinCommand::Ls => "/ls",
            BuiltinCommand::Map => "/map",
            BuiltinCommand::MapRefresh => "/map-refresh",
            BuiltinCommand::Model => "/model",
            BuiltinCommand::Paste => "/paste",
            BuiltinCommand::ReadOnly => "/read-only",
            BuiltinCommand::Reset => "/reset",
            BuiltinCommand::Run => "/run",
            BuiltinCommand::Test => "/test",
            BuiltinCommand::Tokens => "/tokens",
            BuiltinCommand::Undo => "/undo",
            BuiltinCommand::Web => "/web",
        }
    }

    pub fn requires_input(self) -> bool {
        match self {
            BuiltinCommand::Add
            | BuiltinCommand::Architect
            | BuiltinCommand::Ask
            | BuiltinCommand::Code
            | BuiltinCommand::Drop
            | BuiltinCommand::Git
            | BuiltinCommand::Model
            | BuiltinCommand::ReadOnly
            | BuiltinCommand::Run
            | BuiltinCommand::Test
            | BuiltinCommand::Web => true,
            BuiltinCommand::Clear
            | BuiltinCommand::Commit
            | BuiltinCommand::Diff
            | BuiltinCommand::Exit
            | BuiltinCommand::Help
            | BuiltinCommand::Lint
            | BuiltinCommand::Ls
            | BuiltinCommand::Map
            | BuiltinCommand::MapRefresh
            | BuiltinCommand::Paste
            | BuiltinCommand::Reset
            | BuiltinCommand::Tokens
            | BuiltinCommand::Undo => false,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuiltinCommand::Add => "Add files to the chat so aider can edit them",
            BuiltinCommand::Architect => "Enter architect mode to discuss high-level design",
            BuiltinCommand::Ask => "Ask questions about the code base without editing any files",
            BuiltinCommand::Clear => "Clear the chat history",
            BuiltinCommand::Code => "Ask for changes to your code",
            BuiltinCommand::Commit => "Commit edits made outside the chat",
            BuiltinCommand::Diff => "Display the diff of changes since the last message",
            BuiltinCommand::Drop => "Remove files from the chat session",
            BuiltinCommand::Exit => "Exit the application",
            BuiltinCommand::Git => "Run a git command",
            BuiltinCommand::Help => "Ask questions about aider",
            BuiltinCommand::Lint => "Lint and fix in-chat files or all dirty files",
            BuiltinCommand::Ls => "List all known files and indicate which are in the chat",
            BuiltinCommand::Map => "Print out the current repository map",
            BuiltinCommand::MapRefresh => "Force a refresh of the repository map",
            BuiltinCommand::Model => "Switch to a new LLM",
            BuiltinCommand::Paste => "Paste image or text from the clipboard into the chat",
            BuiltinCommand::ReadOnly => "Add files to the chat for reference only",
            BuiltinCommand::Reset => "Drop all files and clear the chat history",
            BuiltinCommand::Run => "Run a shell command and optionally add the output",
            BuiltinCommand::Test => "Run a shell command and add the output on failure",
            BuiltinCommand::Tokens => "Report on the tokens used by the current chat context",
            BuiltinCommand::Undo => "Undo the last git commit if it was done by aider",
            BuiltinCommand::Web => "Scrape a webpage and add its content to the chat",
        }
    }

    pub fn command(self) -> Command {
        Command::new(self.token(), self.requires_input())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: String,
    pub command: Command,
    pub description: String,
}

impl CommandDescriptor {
    pub fn token(&self) -> &str {
        self.command.token()
    }

    pub fn requires_input(&self) -> bool {
        self.command.requires_input()
    }

    fn picker_item(&self) -> PickerItem {
        PickerItem {
            text: self.name.clone(),
            category: if self.requires_input() {
                PickerCategory::Input
            } else {
                PickerCategory::Direct
            },
            description: self.description.clone(),
        }
    }
}

impl From<BuiltinCommand> for CommandDescriptor {
    fn from(builtin: BuiltinCommand) -> Self {
        Self {
            name: builtin.name().to_string(),
            command: builtin.command(),
            description: builtin.description().to_string(),
        }
    }
}

/// Read-only after construction. Entries keep load order for the picker.
#[derive(Debug, Clone)]
pub struct CommandCatalog {
    entries: Vec<CommandDescriptor>,
}

impl CommandCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BuiltinCommand::ALL.iter().map(|&b| b.into()).collect(),
        }
    }

    /// Built-ins followed by user entries. A name may only be used once.
    pub fn with_custom(custom: &[CustomCommand]) -> Result<Self> {
        let mut catalog = Self::builtin();
        for entry in custom {
            let name = entry.name.trim();
            if name.is_empty() || entry.token.trim().is_empty() {
                return Err(ControlError::MissingArgument("command name or token"));
            }
            if catalog.entries.iter().any(|e| e.name == name) {
                return Err(ControlError::DuplicateCommand(name.to_string()));
            }
            catalog.entries.push(CommandDescriptor {
                name: name.to_string(),
                command: Command::new(entry.token.trim(), entry.requires_input),
                description: entry.description.clone(),
            });
        }
        Ok(catalog)
    }

    pub fn lookup(&self, name: &str) -> Result<&CommandDescriptor> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ControlError::UnknownCommand(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn picker_items(&self) -> Vec<PickerItem> {
        self.entries.iter().map(CommandDescriptor::picker_item).collect()
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
