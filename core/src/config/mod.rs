mod load;
mod types;

pub use load::{apply_env_overrides, load, DEFAULT_CONFIG_FILE};
pub use types::{CheckpointSettings, LoggingSettings, ModInputConfig, RunSettings};
