use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::ValidationError;
use crate::scheduler::IntervalSpec;

/// Parameters the host manages itself. A scheme may not declare fields with these names.
pub const RESERVED_PARAMS: &[&str] = &[
    "disabled",
    "host",
    "index",
    "interval",
    "python.version",
    "run_introspection",
    "schedule",
    "source",
    "sourcetype",
    "start_by_shell",
];

/// Server metadata sent with every handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSettings {
    pub server_host: Option<String>,
    pub server_uri: Option<String>,
    pub session_key: Option<String>,
    pub checkpoint_dir: Option<PathBuf>,
}

/// One configured instance of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stanza {
    pub name: String,
    pub params: BTreeMap<String, String>,
}

impl Stanza {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.param(key).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn host(&self) -> Option<&str> {
        self.non_empty("host")
    }

    pub fn index(&self) -> Option<&str> {
        self.non_empty("index")
    }

    pub fn sourcetype(&self) -> Option<&str> {
        self.non_empty("sourcetype")
    }

    pub fn source(&self) -> Option<&str> {
        self.non_empty("source")
    }

    pub fn is_disabled(&self) -> bool {
        matches!(
            self.non_empty("disabled").map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        )
    }

    /// `"web_ping"` for `"web_ping://example"`.
    pub fn scheme_name(&self) -> &str {
        self.name
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or(&self.name)
    }

    /// `"example"` for `"web_ping://example"`.
    pub fn instance_name(&self) -> &str {
        self.name
            .split_once("://")
            .map(|(_, instance)| instance)
            .unwrap_or(&self.name)
    }

    pub fn interval(&self) -> Result<IntervalSpec, ValidationError> {
        IntervalSpec::from_params(self.param("interval"), self.param("schedule"))
    }
}

/// The "run every configured stanza" payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub globals: GlobalSettings,
    pub stanzas: Vec<Stanza>,
}

/// The "validate this stanza" payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationItem {
    pub globals: GlobalSettings,
    pub stanza: Stanza,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handshake {
    Run(RunConfig),
    Validate(ValidationItem),
}

impl Handshake {
    pub fn kind(&self) -> &'static str {
        match self {
            Handshake::Run(_) => "run",
            Handshake::Validate(_) => "validation",
        }
    }

    pub fn globals(&self) -> &GlobalSettings {
        match self {
            Handshake::Run(cfg) => &cfg.globals,
            Handshake::Validate(item) => &item.globals,
        }
    }
}
