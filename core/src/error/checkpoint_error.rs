// core/src/error/checkpoint_error.rs
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint i/o error: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("checkpoint file is corrupt: {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("checkpoint serialize error")]
    Serialize(#[source] serde_json::Error),

    #[error("stanza is already running in another process: {stanza}")]
    Busy { stanza: String },
}

impl CheckpointError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckpointError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, CheckpointError::Busy { .. })
    }
}
