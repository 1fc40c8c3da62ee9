use crate::error::ConfigParseError;
use crate::fields::DataType;
use crate::xml::{parse_document, XmlError};

use super::StreamingMode;

/// One `<arg>` of a scheme document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDescriptor {
    pub name: String,
    pub title: String,
    pub description: String,
    pub data_type: DataType,
    pub required_on_create: bool,
    pub required_on_edit: bool,
}

/// A scheme document read back from XML, as the host sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeDescriptor {
    pub title: String,
    pub description: String,
    pub use_external_validation: bool,
    pub use_single_instance: bool,
    pub streaming_mode: StreamingMode,
    pub args: Vec<ArgDescriptor>,
}

impl SchemeDescriptor {
    pub fn parse(xml: &str) -> Result<Self, ConfigParseError> {
        let root = parse_document(xml).map_err(|e| match e {
            XmlError::Empty => ConfigParseError::Empty,
            XmlError::Malformed(m) => ConfigParseError::Xml(m),
        })?;
        if root.name != "scheme" {
            return Err(ConfigParseError::UnexpectedRoot(root.name));
        }

        let title = root
            .child_text("title")
            .ok_or(ConfigParseError::MissingElement("title"))?
            .to_string();
        let description = root.child_text("description").unwrap_or_default().to_string();
        let flag = |name: &str| {
            root.child_text(name)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false)
        };
        let streaming_mode = root
            .child_text("streaming_mode")
            .and_then(StreamingMode::parse)
            .unwrap_or(StreamingMode::Simple);

        let mut args = Vec::new();
        if let Some(list) = root.child("endpoint").and_then(|e| e.child("args")) {
            for arg in list.children_named("arg") {
                let name = arg
                    .attr("name")
                    .ok_or(ConfigParseError::MissingName("arg"))?
                    .to_string();
                let bool_child = |child: &str| {
                    arg.child_text(child)
                        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                        .unwrap_or(false)
                };
                args.push(ArgDescriptor {
                    title: arg.child_text("title").unwrap_or(&name).to_string(),
                    description: arg.child_text("description").unwrap_or_default().to_string(),
                    data_type: arg
                        .child_text("data_type")
                        .and_then(DataType::parse)
                        .unwrap_or(DataType::String),
                    required_on_create: bool_child("required_on_create"),
                    required_on_edit: bool_child("required_on_edit"),
                    name,
                });
            }
        }

        Ok(Self {
            title,
            description,
            use_external_validation: flag("use_external_validation"),
            use_single_instance: flag("use_single_instance"),
            streaming_mode,
            args,
        })
    }
}
