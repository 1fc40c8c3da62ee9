use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::checkpoint::CheckpointHandle;
use crate::error::{InputError, ValidationErrors};
use crate::events_out::Event;
use crate::handshake::{GlobalSettings, Stanza};
use crate::scheme::CleanedParams;

/// Everything one stanza run can see.
pub struct RunContext<'a> {
    pub stanza: &'a Stanza,
    pub params: &'a CleanedParams,
    pub globals: &'a GlobalSettings,
    /// Saved when the run succeeds; discarded when it fails.
    pub checkpoint: &'a mut CheckpointHandle,
    /// Start of the run cycle, shared by every stanza in it.
    pub now: DateTime<Utc>,
    /// Budget after which the run is abandoned and counted as failed.
    pub timeout: Option<Duration>,
}

/// Business logic of one modular input.
///
/// `run` returns the events of one stanza. They are written only after it returns `Ok`,
/// so a failing run leaves nothing in the output stream.
#[async_trait]
pub trait ModularInput: Send + Sync {
    async fn run(&self, ctx: RunContext<'_>) -> Result<Vec<Event>, InputError>;

    /// Checks that need more than one field at a time. Called during validation after
    /// every field passed on its own.
    fn validate_extra(&self, _params: &CleanedParams) -> Result<(), ValidationErrors> {
        Ok(())
    }
}
