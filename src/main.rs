use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use aider_term_lib::console::{self, ConsoleHost};
use aider_term_lib::models::merge;
use aider_term_lib::services::{OutputSink, PtySpawner};
use aider_term_lib::{ConfigOverrides, SessionConfig, SessionController};

/// Run aider in a terminal and drive it with editor-style actions on stdin
#[derive(Parser)]
#[command(name = "aider-term", version)]
struct Cli {
    /// Assistant executable
    #[arg(long, env = "AIDER_TERM_CMD")]
    cmd: Option<String>,

    /// Arguments for the assistant, replacing the defaults
    #[arg(
        long,
        env = "AIDER_TERM_ARGS",
        value_delimiter = ' ',
        num_args = 1..,
        allow_hyphen_values = true
    )]
    args: Option<Vec<String>>,

    /// Working directory for the assistant
    #[arg(long)]
    cwd: Option<String>,

    /// JSON file with the base session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// File to open as the current buffer
    file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cmd: self.cmd.clone(),
            args: self.args.clone(),
            cwd: self.cwd.clone(),
            ..Default::default()
        }
    }

    fn base_config(&self) -> anyhow::Result<SessionConfig> {
        let file_config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                SessionConfig::from_json(&json)
                    .with_context(|| format!("Invalid config in {}", path.display()))?
            }
            None => SessionConfig::default(),
        };
        Ok(merge(&file_config, &self.overrides()))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.base_config()?;

    let host = Arc::new(ConsoleHost::stdin());
    if let Some(file) = &cli.file {
        host.open(file)
            .with_context(|| format!("Failed to open {}", file.display()))?;
    }

    // Mirror everything the assistant prints
    let sink: OutputSink = Arc::new(|data: Vec<u8>| {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(&data);
        let _ = out.flush();
    });

    let controller = SessionController::new(
        config,
        host.clone(),
        host.clone(),
        Arc::new(PtySpawner::new(sink)),
    )?;

    eprintln!("{}", console::HELP);
    while let Some(line) = host.next_line().await {
        if !console::run_action(&controller, &*host, console::parse_action(&line)).await {
            break;
        }
    }

    log::info!("Shutting down - closing assistant session");
    controller.shutdown();
    Ok(())
}
