// core/src/error/input_error.rs
use thiserror::Error;

/// Failure raised by the business logic of a concrete input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input failed: {0:#}")]
    Failed(#[source] anyhow::Error),

    #[error("input timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("input panicked: {0}")]
    Panicked(String),
}

impl From<anyhow::Error> for InputError {
    fn from(e: anyhow::Error) -> Self {
        InputError::Failed(e)
    }
}

impl InputError {
    pub fn msg(message: impl std::fmt::Display + std::fmt::Debug + Send + Sync + 'static) -> Self {
        InputError::Failed(anyhow::Error::msg(message))
    }
}
