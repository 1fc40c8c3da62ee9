use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RECORD_VERSION: u32 = 1;

/// What is stored for one stanza. Unknown or missing keys fall back to defaults so
/// older files stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointRecord {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Last successful run. Only ever moves forward.
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,

    #[serde(default)]
    pub last_error: Option<String>,

    #[serde(default)]
    pub last_error_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub run_count: u64,

    /// Opaque state owned by the input's business logic.
    #[serde(default)]
    pub state: serde_json::Value,
}

fn default_version() -> u32 {
    RECORD_VERSION
}

impl Default for CheckpointRecord {
    fn default() -> Self {
        Self {
            version: default_version(),
            last_run: None,
            last_error: None,
            last_error_at: None,
            run_count: 0,
            state: serde_json::Value::Null,
        }
    }
}

impl CheckpointRecord {
    pub fn record_success(&mut self, at: DateTime<Utc>) {
        self.advance_last_run(Some(at));
        self.last_error = None;
        self.last_error_at = None;
        self.run_count = self.run_count.saturating_add(1);
    }

    /// Keeps `last_run` untouched so the next cycle retries.
    pub fn record_failure(&mut self, at: DateTime<Utc>, error: impl Into<String>) {
        self.last_error = Some(error.into());
        self.last_error_at = Some(at);
    }

    pub(crate) fn advance_last_run(&mut self, candidate: Option<DateTime<Utc>>) {
        self.last_run = match (self.last_run, candidate) {
            (Some(current), Some(new)) => Some(current.max(new)),
            (current, new) => current.or(new),
        };
    }
}
