//! Per-stanza run state persisted between invocations.

mod handle;
mod record;
mod store;

pub use handle::CheckpointHandle;
pub use record::CheckpointRecord;
pub use store::{checkpoint_key, CheckpointStore, StanzaLock};
