use scribe_core::DEFAULT_WINDOW_MINUTES;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Server configuration, loaded from `scribe.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScribeConfig {
    pub server: ServerSection,
    pub context: ContextSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// HTTP listen address
    pub http_addr: SocketAddr,

    /// Data directory
    pub data_dir: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: "0.0.0.0:8750".parse().unwrap(),
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSection {
    /// Trailing window (minutes) used when a chat request names no
    /// explicit context messages.
    pub window_minutes: i64,
}

impl Default for ContextSection {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

impl ScribeConfig {
    /// Load from a toml file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Load from a toml file, falling back to defaults if the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Collect validation errors. Empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.context.window_minutes <= 0 {
            errors.push(format!(
                "[context] window_minutes must be positive, got {}",
                self.context.window_minutes
            ));
        }
        errors
    }

    /// Ensure the data directory exists.
    pub fn ensure_data_dir(&self) -> anyhow::Result<()> {
        if !self.server.data_dir.exists() {
            std::fs::create_dir_all(&self.server.data_dir)?;
        }
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.server.data_dir.join("scribe.redb")
    }
}
