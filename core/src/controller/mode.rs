/// What the host asked this invocation to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Scheme,
    Validate,
    Run,
}

impl Mode {
    /// `--scheme` wins over `--validate-arguments`; neither flag means run.
    pub fn from_flags(scheme: bool, validate_arguments: bool) -> Self {
        if scheme {
            Mode::Scheme
        } else if validate_arguments {
            Mode::Validate
        } else {
            Mode::Run
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Scheme => "scheme",
            Mode::Validate => "validate",
            Mode::Run => "run",
        }
    }

    /// Scheme mode never reads a handshake.
    pub fn reads_handshake(&self) -> bool {
        !matches!(self, Mode::Scheme)
    }
}
