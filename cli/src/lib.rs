//! Process entry point shared by every modular input binary.
//!
//! A binary builds its [`Scheme`] and business logic, then hands both to [`run_main`]
//! and exits with the returned code.

pub mod commands;
pub mod error;
pub mod logging;
pub mod stdio;

use std::sync::Arc;

use clap::Parser;
use modinput_core::api::{Controller, ModularInput, Scheme, EXIT_CONFIG};

pub use commands::cli::Args;
pub use error::CliError;

/// Parses the process arguments and runs one invocation.
pub fn run_main(scheme: Scheme, input: Arc<dyn ModularInput>) -> i32 {
    run_with_args(Args::parse(), scheme, input)
}

pub fn run_with_args(args: Args, scheme: Scheme, input: Arc<dyn ModularInput>) -> i32 {
    match try_run(args, scheme, input) {
        Ok(code) => code,
        Err(e) => {
            // The subscriber may not exist yet, so stderr is written directly.
            eprintln!("modinput: {e}");
            EXIT_CONFIG
        }
    }
}

fn try_run(args: Args, scheme: Scheme, input: Arc<dyn ModularInput>) -> Result<i32, CliError> {
    let config = modinput_core::api::load_config(args.config.as_deref())?;
    let _log = logging::init_logging(&config.logging)?;

    let mode = args.mode();
    let handshake = if mode.reads_handshake() {
        stdio::read_handshake(args.input_file.as_deref())?
    } else {
        String::new()
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    let controller = Controller::new(scheme, input, config);
    let stdout = std::io::stdout();
    let code = runtime.block_on(controller.execute(mode, &handshake, stdout.lock()));

    tracing::debug!(
        target: "modinput.cli",
        mode = mode.as_str(),
        code,
        "invocation finished"
    );
    Ok(code)
}
