use chrono::{DateTime, Utc};

use crate::handshake::{GlobalSettings, Stanza};

/// One unit of output. Metadata left unset falls back to [`EventDefaults`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub data: String,
    pub time: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub sourcetype: Option<String>,
    pub index: Option<String>,
    pub host: Option<String>,
    pub unbroken: bool,
    pub done: bool,
}

impl Event {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_sourcetype(mut self, sourcetype: impl Into<String>) -> Self {
        self.sourcetype = Some(sourcetype.into());
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Marks a fragment of a larger event; the host joins fragments until `done`.
    pub fn unbroken(mut self, done: bool) -> Self {
        self.unbroken = true;
        self.done = done;
        self
    }
}

/// Stanza-level and global fallbacks for event metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDefaults {
    pub stanza: Option<String>,
    pub source: Option<String>,
    pub sourcetype: Option<String>,
    pub index: Option<String>,
    pub host: Option<String>,
}

impl EventDefaults {
    pub fn for_stanza(stanza: &Stanza, globals: &GlobalSettings) -> Self {
        Self {
            stanza: Some(stanza.name.clone()),
            source: Some(stanza.source().unwrap_or(&stanza.name).to_string()),
            sourcetype: stanza.sourcetype().map(str::to_string),
            index: stanza.index().map(str::to_string),
            host: stanza
                .host()
                .map(str::to_string)
                .or_else(|| globals.server_host.clone()),
        }
    }
}

/// Epoch seconds with millisecond precision, as the host expects in `<time>`.
pub(crate) fn format_time(time: &DateTime<Utc>) -> String {
    format!("{}.{:03}", time.timestamp(), time.timestamp_subsec_millis())
}
