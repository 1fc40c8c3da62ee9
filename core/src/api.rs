//! Stable re-exports for consumers (`cli` and the crates that implement inputs).
//!
//! Prefer importing from `modinput_core::api` instead of reaching into internal modules.

pub use crate::checkpoint::{checkpoint_key, CheckpointHandle, CheckpointRecord, CheckpointStore};
pub use crate::config::{load as load_config, LoggingSettings, ModInputConfig, RunSettings};
pub use crate::controller::{
    Controller, Mode, ModularInput, RunContext, RunSummary, EXIT_CONFIG, EXIT_OK, EXIT_REJECTED,
    EXIT_STANZA_FAILED,
};
pub use crate::error::{
    CheckpointError, ConfigError, ConfigParseError, InputError, SchemeError, ValidationError,
    ValidationErrors,
};
pub use crate::events_out::{Event, EventDefaults, EventStream, EventWriter};
pub use crate::fields::{DataType, Field, FieldKind, IpNetwork, Value};
pub use crate::handshake::{parse_handshake, GlobalSettings, Handshake, Stanza};
pub use crate::scheduler::{IntervalSpec, RunScheduler};
pub use crate::scheme::{CleanedParams, InstanceMode, Scheme, SchemeBuilder, SchemeDescriptor, StreamingMode};
