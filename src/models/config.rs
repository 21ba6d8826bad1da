//! Session configuration
//! The base config is built once at startup; every operation merges its own
//! overrides on top of it and passes the result along by value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

pub const DEFAULT_CMD: &str = "aider";
pub const DEFAULT_NEW_CONTEXT_COMMAND: &str = "/clear";

fn default_args() -> Vec<String> {
    vec![
        "--no-auto-commits".to_string(),
        "--pretty".to_string(),
        "--stream".to_string(),
    ]
}

/// A catalog entry registered by the user on top of the built-in commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommand {
    pub name: String,
    pub token: String,
    #[serde(default)]
    pub requires_input: bool,
    #[serde(default)]
    pub description: String,
}

/// Everything the terminal session is created with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cmd: String,
    pub args: Vec<String>,
    pub cwd: Option<String>,
    pub env: BTreeMap<String, String>,
    pub cols: u16,
    pub rows: u16,
    /// Wrap multi-line payloads in bracketed-paste markers.
    pub bracketed_paste: bool,
    /// Line written ahead of a payload that starts a fresh conversation.
    pub new_context_command: String,
    /// Share the editor's open buffers with the assistant when it starts.
    pub auto_manage_context: bool,
    /// Files passed on the assistant's command line at creation.
    pub initial_files: Vec<String>,
    pub commands: Vec<CustomCommand>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cmd: DEFAULT_CMD.to_string(),
            args: default_args(),
            cwd: None,
            env: BTreeMap::new(),
            cols: 80,
            rows: 24,
            bracketed_paste: true,
            new_context_command: DEFAULT_NEW_CONTEXT_COMMAND.to_string(),
            auto_manage_context: false,
            initial_files: Vec::new(),
            commands: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Full argument list for the assistant process.
    pub fn process_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        if self.auto_manage_context {
            args.extend(self.initial_files.iter().cloned());
        }
        args
    }
}

/// Per-call overrides. Every field left as `None` keeps the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub cols: Option<u16>,
    #[serde(default)]
    pub rows: Option<u16>,
    #[serde(default)]
    pub bracketed_paste: Option<bool>,
    #[serde(default)]
    pub new_context_command: Option<String>,
    #[serde(default)]
    pub auto_manage_context: Option<bool>,
    #[serde(default)]
    pub initial_files: Option<Vec<String>>,
}

impl ConfigOverrides {
    /// Parse an override object such as `{"auto_manage_context": true}`.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Same overrides, plus context management over the given files.
    pub fn with_managed_files(&self, files: Vec<String>) -> Self {
        Self {
            auto_manage_context: Some(true),
            initial_files: Some(files),
            ..self.clone()
        }
    }
}

/// base ⊕ overrides. Neither input is touched.
pub fn merge(base: &SessionConfig, overrides: &ConfigOverrides) -> SessionConfig {
    SessionConfig {
        cmd: overrides.cmd.clone().unwrap_or_else(|| base.cmd.clone()),
        args: overrides.args.clone().unwrap_or_else(|| base.args.clone()),
        cwd: overrides.cwd.clone().or_else(|| base.cwd.clone()),
        env: match &overrides.env {
            Some(extra) => {
                let mut env = base.env.clone();
                env.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
                env
            }
            None => base.env.clone(),
        },
        cols: overrides.cols.unwrap_or(base.cols),
        rows: overrides.rows.unwrap_or(base.rows),
        bracketed_paste: overrides.bracketed_paste.unwrap_or(base.bracketed_paste),
        new_context_command: overrides
            .new_context_command
            .clone()
            .unwrap_or_else(|| base.new_context_command.clone()),
        auto_manage_context: overrides
            .auto_manage_context
            .unwrap_or(base.auto_manage_context),
        initial_files: overrides
            .initial_files
            .clone()
            .unwrap_or_else(|| base.initial_files.clone()),
        commands: base.commands.clone(),
    }
}
