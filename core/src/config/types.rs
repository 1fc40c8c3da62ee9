use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Framework settings. Everything here is optional; an absent file gives the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModInputConfig {
    #[serde(default)]
    pub run: RunSettings,

    #[serde(default)]
    pub checkpoint: CheckpointSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Upper bound on one stanza's business logic. Unset means no limit.
    #[serde(default)]
    pub stanza_timeout_secs: Option<u64>,
}

fn default_max_concurrency() -> usize {
    1
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            stanza_timeout_secs: None,
        }
    }
}

impl RunSettings {
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    pub fn stanza_timeout(&self) -> Option<Duration> {
        self.stanza_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSettings {
    /// Overrides the directory sent in the handshake.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "modinput".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}
