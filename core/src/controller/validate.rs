use std::io::{self, Write};

use crate::error::ValidationErrors;
use crate::handshake::{parse_validation, Stanza};
use crate::xml::escape;

use super::exit::{EXIT_CONFIG, EXIT_OK, EXIT_REJECTED};
use super::Controller;

impl Controller {
    /// Every reason the stanza would be rejected: field failures, the interval, then the
    /// input's own cross-field checks.
    pub fn validate_stanza(&self, stanza: &Stanza) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        let params = match self.scheme.clean_params(&stanza.params) {
            Ok(params) => Some(params),
            Err(field_errors) => {
                errors.extend(field_errors);
                None
            }
        };
        if let Err(e) = stanza.interval() {
            errors.push(e);
        }
        if let Some(params) = params {
            if let Err(extra) = self.input.validate_extra(&params) {
                errors.extend(extra);
            }
        }
        errors
    }

    pub(super) fn validate_mode<W: Write>(&self, handshake: &str, mut out: W) -> i32 {
        let item = match parse_validation(handshake) {
            Ok(item) => item,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    error = %e,
                    "failed to parse validation payload"
                );
                write_error_document(&mut out, &e.to_string());
                return EXIT_CONFIG;
            }
        };

        let errors = self.validate_stanza(&item.stanza);
        if errors.is_empty() {
            tracing::info!(
                target: "modinput.controller",
                stanza = %item.stanza.name,
                "stanza accepted"
            );
            return EXIT_OK;
        }

        for e in errors.iter() {
            tracing::warn!(
                target: "modinput.controller",
                stanza = %item.stanza.name,
                field = %e.field,
                error = %e.message,
                "invalid parameter"
            );
        }
        write_error_document(&mut out, &errors.to_string());
        EXIT_REJECTED
    }
}

fn write_error_document<W: Write>(out: &mut W, message: &str) {
    if let Err(e) = try_write_error_document(out, message) {
        tracing::error!(
            target: "modinput.controller",
            error = %e,
            "failed to write validation result"
        );
    }
}

fn try_write_error_document<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "<error><message>{}</message></error>", escape(message))?;
    out.flush()
}
