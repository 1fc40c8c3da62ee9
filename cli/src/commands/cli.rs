use std::path::PathBuf;

use clap::Parser;
use modinput_core::api::Mode;

/// Flags the host passes to a modular input process.
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about = "Runs a modular input for the host")]
pub struct Args {
    /// Print the input's scheme and exit.
    #[arg(long, conflicts_with = "validate_arguments")]
    pub scheme: bool,

    /// Validate the stanza sent on stdin.
    #[arg(long = "validate-arguments")]
    pub validate_arguments: bool,

    /// Read the handshake from a file instead of stdin.
    #[arg(long, hide = true, value_name = "PATH")]
    pub input_file: Option<PathBuf>,

    /// Framework config file. Defaults to `modinput.toml` in the working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn mode(&self) -> Mode {
        Mode::from_flags(self.scheme, self.validate_arguments)
    }
}
