mod checkpoint_error;
mod config_error;
mod input_error;
mod parse_error;
mod scheme_error;
mod validation_error;

pub use checkpoint_error::CheckpointError;
pub use config_error::ConfigError;
pub use input_error::InputError;
pub use parse_error::ConfigParseError;
pub use scheme_error::SchemeError;
pub use validation_error::{ValidationError, ValidationErrors};
