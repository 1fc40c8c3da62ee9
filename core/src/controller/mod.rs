//! Dispatches an invocation to scheme, validate or run handling.

mod exit;
mod input;
mod mode;
mod run;
mod validate;

use std::io::Write;
use std::sync::Arc;

use crate::config::ModInputConfig;
use crate::scheme::Scheme;

pub use exit::{EXIT_CONFIG, EXIT_OK, EXIT_REJECTED, EXIT_STANZA_FAILED};
pub use input::{ModularInput, RunContext};
pub use mode::Mode;
pub use run::RunSummary;

pub struct Controller {
    scheme: Scheme,
    input: Arc<dyn ModularInput>,
    config: ModInputConfig,
}

impl Controller {
    pub fn new(scheme: Scheme, input: Arc<dyn ModularInput>, config: ModInputConfig) -> Self {
        Self {
            scheme,
            input,
            config,
        }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn config(&self) -> &ModInputConfig {
        &self.config
    }

    /// Handles one invocation and returns the process exit code. `handshake` is ignored
    /// in scheme mode.
    pub async fn execute<W: Write>(&self, mode: Mode, handshake: &str, out: W) -> i32 {
        tracing::debug!(
            target: "modinput.controller",
            mode = mode.as_str(),
            bytes = handshake.len(),
            "invocation started"
        );
        match mode {
            Mode::Scheme => self.write_scheme(out),
            Mode::Validate => self.validate_mode(handshake, out),
            Mode::Run => self.run_mode(handshake, out).await,
        }
    }

    fn write_scheme<W: Write>(&self, mut out: W) -> i32 {
        let xml = self.scheme.to_xml();
        match out.write_all(xml.as_bytes()).and_then(|_| out.flush()) {
            Ok(()) => EXIT_OK,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    error = %e,
                    "failed to write scheme"
                );
                EXIT_CONFIG
            }
        }
    }
}

/// `outer: inner: root` for logging an error together with its sources.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        out.push_str(": ");
        out.push_str(&e.to_string());
        source = e.source();
    }
    out
}
