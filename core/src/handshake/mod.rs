//! Parsing of the configuration the host pipes to the process on stdin.

mod parser;
mod types;

pub use parser::{parse_handshake, parse_run, parse_validation};
pub use types::{GlobalSettings, Handshake, RunConfig, Stanza, ValidationItem, RESERVED_PARAMS};
