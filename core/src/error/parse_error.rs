// core/src/error/parse_error.rs
use thiserror::Error;

/// Malformed handshake payload. Always fatal for the invocation.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("handshake is not well-formed xml: {0}")]
    Xml(String),

    #[error("handshake is empty")]
    Empty,

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("missing required element <{0}>")]
    MissingElement(&'static str),

    #[error("<{0}> element has no name attribute")]
    MissingName(&'static str),

    #[error("duplicate stanza: {0}")]
    DuplicateStanza(String),

    #[error("expected exactly one <item> to validate, found {0}")]
    ItemCount(usize),

    #[error("expected a {expected} payload, got a {found} payload")]
    WrongMode {
        expected: &'static str,
        found: &'static str,
    },
}
