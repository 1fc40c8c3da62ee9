//! The scheme an input advertises to the host, and validation of stanza parameters
//! against it.

mod descriptor;
mod params;

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use crate::error::{SchemeError, ValidationErrors};
use crate::fields::Field;
use crate::handshake::RESERVED_PARAMS;
use crate::xml::escape;

pub use descriptor::{ArgDescriptor, SchemeDescriptor};
pub use params::CleanedParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamingMode {
    Simple,
    #[default]
    Xml,
}

impl StreamingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamingMode::Simple => "simple",
            StreamingMode::Xml => "xml",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "simple" => Some(StreamingMode::Simple),
            "xml" => Some(StreamingMode::Xml),
            _ => None,
        }
    }
}

/// Whether one process handles every stanza or the host starts one per stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstanceMode {
    Single,
    #[default]
    Multiple,
}

#[derive(Debug, Clone)]
pub struct Scheme {
    title: String,
    description: String,
    use_external_validation: bool,
    streaming_mode: StreamingMode,
    instance_mode: InstanceMode,
    fields: Vec<Field>,
}

impl Scheme {
    pub fn builder(title: impl Into<String>, description: impl Into<String>) -> SchemeBuilder {
        SchemeBuilder {
            title: title.into(),
            description: description.into(),
            use_external_validation: true,
            streaming_mode: StreamingMode::default(),
            instance_mode: InstanceMode::default(),
            fields: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn use_external_validation(&self) -> bool {
        self.use_external_validation
    }

    pub fn use_single_instance(&self) -> bool {
        self.instance_mode == InstanceMode::Single
    }

    pub fn streaming_mode(&self) -> StreamingMode {
        self.streaming_mode
    }

    pub fn instance_mode(&self) -> InstanceMode {
        self.instance_mode
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Applies every declared field to the raw values. Errors from all fields are
    /// collected into one report; parameters with no declared field are ignored.
    pub fn clean_params(
        &self,
        raw: &BTreeMap<String, String>,
    ) -> Result<CleanedParams, ValidationErrors> {
        let mut cleaned = CleanedParams::default();
        let mut errors = ValidationErrors::new();

        for field in &self.fields {
            match field.validate(raw.get(field.name()).map(String::as_str)) {
                Ok(value) if value.is_null() => {}
                Ok(value) => cleaned.insert(field.name(), value),
                Err(e) => errors.push(e),
            }
        }

        errors.into_result().map(|_| cleaned)
    }

    /// The document returned for `--scheme`.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<scheme>\n");
        let _ = writeln!(out, "    <title>{}</title>", escape(&self.title));
        let _ = writeln!(
            out,
            "    <description>{}</description>",
            escape(&self.description)
        );
        let _ = writeln!(
            out,
            "    <use_external_validation>{}</use_external_validation>",
            self.use_external_validation
        );
        let _ = writeln!(
            out,
            "    <use_single_instance>{}</use_single_instance>",
            self.use_single_instance()
        );
        let _ = writeln!(
            out,
            "    <streaming_mode>{}</streaming_mode>",
            self.streaming_mode.as_str()
        );
        out.push_str("    <endpoint>\n        <args>\n");
        for field in &self.fields {
            let _ = writeln!(out, "            <arg name=\"{}\">", escape(field.name()));
            let _ = writeln!(out, "                <title>{}</title>", escape(field.title()));
            let _ = writeln!(
                out,
                "                <description>{}</description>",
                escape(field.description())
            );
            let _ = writeln!(
                out,
                "                <data_type>{}</data_type>",
                field.data_type().as_str()
            );
            let _ = writeln!(
                out,
                "                <required_on_create>{}</required_on_create>",
                field.is_required_on_create()
            );
            let _ = writeln!(
                out,
                "                <required_on_edit>{}</required_on_edit>",
                field.is_required_on_edit()
            );
            out.push_str("            </arg>\n");
        }
        out.push_str("        </args>\n    </endpoint>\n</scheme>\n");
        out
    }
}

pub struct SchemeBuilder {
    title: String,
    description: String,
    use_external_validation: bool,
    streaming_mode: StreamingMode,
    instance_mode: InstanceMode,
    fields: Vec<Field>,
}

impl SchemeBuilder {
    pub fn use_external_validation(mut self, enabled: bool) -> Self {
        self.use_external_validation = enabled;
        self
    }

    pub fn streaming_mode(mut self, mode: StreamingMode) -> Self {
        self.streaming_mode = mode;
        self
    }

    pub fn instance_mode(mut self, mode: InstanceMode) -> Self {
        self.instance_mode = mode;
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Result<Scheme, SchemeError> {
        if self.title.trim().is_empty() {
            return Err(SchemeError::Blank("title"));
        }
        if self.description.trim().is_empty() {
            return Err(SchemeError::Blank("description"));
        }
        let mut seen = HashSet::new();
        for field in &self.fields {
            if RESERVED_PARAMS.contains(&field.name()) {
                return Err(SchemeError::ReservedField(field.name().to_string()));
            }
            if !seen.insert(field.name()) {
                return Err(SchemeError::DuplicateField(field.name().to_string()));
            }
        }

        Ok(Scheme {
            title: self.title,
            description: self.description,
            use_external_validation: self.use_external_validation,
            streaming_mode: self.streaming_mode,
            instance_mode: self.instance_mode,
            fields: self.fields,
        })
    }
}
