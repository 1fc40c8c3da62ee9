// core/src/error/scheme_error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemeError {
    #[error("the {0} parameter cannot be empty")]
    Blank(&'static str),

    #[error("duplicate field in scheme: {0}")]
    DuplicateField(String),

    #[error("field name is reserved by the host: {0}")]
    ReservedField(String),

    #[error("regex pattern invalid for field {field}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
