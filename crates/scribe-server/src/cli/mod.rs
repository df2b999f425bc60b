pub mod ask;
pub mod backup;
pub mod config_cmd;
pub mod init;
pub mod sessions;
pub mod stats;

use crate::config::ScribeConfig;
use clap::{Args, Parser, Subcommand};
use scribe_core::{Scribe, ScribeOptions};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(version, about = "Session-based transcription store with a context-aware chat assistant")]
pub struct Cli {
    /// Path to scribe.toml
    #[arg(
        long,
        global = true,
        env = "SCRIBE_CONFIG",
        default_value = "scribe.toml"
    )]
    pub config: PathBuf,

    /// Path to data directory (overrides config file)
    #[arg(long, global = true, env = "SCRIBE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve,
    /// Write a default scribe.toml
    Init,
    /// Config file helpers
    #[command(subcommand)]
    Config(ConfigCommands),
    /// List recording sessions
    Sessions,
    /// Ask the assistant a question against recent context
    Ask(AskArgs),
    /// Storage overview
    Stats,
    /// Back up the database
    Backup(BackupArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Check the config file for errors
    Validate,
    /// Print the effective configuration
    Show,
}

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// Session id
    pub session: Uuid,

    /// The question
    pub question: String,

    /// Context window in minutes (overrides config)
    #[arg(long)]
    pub minutes: Option<i64>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct BackupArgs {
    /// Destination file for the snapshot
    pub dest: PathBuf,
}

impl Cli {
    /// Effective config: file values with command-line overrides applied.
    pub fn effective_config(&self) -> ScribeConfig {
        let mut config = ScribeConfig::load_or_default(&self.config);
        if let Some(dir) = &self.data_dir {
            config.server.data_dir = dir.clone();
        }
        config
    }

    /// Open the embedded store for client commands.
    pub fn open_scribe(&self) -> anyhow::Result<Scribe> {
        let config = self.effective_config();
        config.ensure_data_dir()?;
        Ok(Scribe::open(
            config.db_path(),
            ScribeOptions {
                context_window_minutes: config.context.window_minutes,
            },
        )?)
    }
}

/// Truncate a value for table output.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let byte_end = s
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    format!("{}...", &s[..byte_end])
}
