//! Process exit codes reported to the host.

pub const EXIT_OK: i32 = 0;
/// Validate mode rejected the stanza.
pub const EXIT_REJECTED: i32 = 1;
/// The handshake, the framework config or the output channel was unusable.
pub const EXIT_CONFIG: i32 = 2;
/// Run mode finished but at least one stanza failed.
pub const EXIT_STANZA_FAILED: i32 = 3;
