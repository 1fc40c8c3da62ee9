use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use crate::error::ConfigParseError;
use crate::xml::{parse_document, Element, XmlError};

use super::types::{GlobalSettings, Handshake, RunConfig, Stanza, ValidationItem};

/// Parses either handshake shape: `<input>` (run) or `<items>` (validate).
pub fn parse_handshake(raw: &str) -> Result<Handshake, ConfigParseError> {
    let root = parse_document(raw).map_err(|e| match e {
        XmlError::Empty => ConfigParseError::Empty,
        XmlError::Malformed(m) => ConfigParseError::Xml(m),
    })?;

    match root.name.as_str() {
        "input" => parse_run_root(&root).map(Handshake::Run),
        "items" => parse_items_root(&root).map(Handshake::Validate),
        other => Err(ConfigParseError::UnexpectedRoot(other.to_string())),
    }
}

pub fn parse_run(raw: &str) -> Result<RunConfig, ConfigParseError> {
    match parse_handshake(raw)? {
        Handshake::Run(cfg) => Ok(cfg),
        other => Err(ConfigParseError::WrongMode {
            expected: "run",
            found: other.kind(),
        }),
    }
}

pub fn parse_validation(raw: &str) -> Result<ValidationItem, ConfigParseError> {
    match parse_handshake(raw)? {
        Handshake::Validate(item) => Ok(item),
        other => Err(ConfigParseError::WrongMode {
            expected: "validation",
            found: other.kind(),
        }),
    }
}

fn parse_globals(root: &Element) -> GlobalSettings {
    let text = |name: &str| {
        root.child_text(name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    GlobalSettings {
        server_host: text("server_host"),
        server_uri: text("server_uri"),
        session_key: text("session_key"),
        checkpoint_dir: text("checkpoint_dir").map(PathBuf::from),
    }
}

fn parse_run_root(root: &Element) -> Result<RunConfig, ConfigParseError> {
    let configuration = root
        .child("configuration")
        .ok_or(ConfigParseError::MissingElement("configuration"))?;

    let mut seen = HashSet::new();
    let mut stanzas = Vec::new();
    for el in configuration.children_named("stanza") {
        let stanza = parse_stanza(el, "stanza")?;
        if !seen.insert(stanza.name.clone()) {
            return Err(ConfigParseError::DuplicateStanza(stanza.name));
        }
        stanzas.push(stanza);
    }

    Ok(RunConfig {
        globals: parse_globals(root),
        stanzas,
    })
}

fn parse_items_root(root: &Element) -> Result<ValidationItem, ConfigParseError> {
    let items: Vec<&Element> = root.children_named("item").collect();
    if items.len() != 1 {
        return Err(ConfigParseError::ItemCount(items.len()));
    }

    Ok(ValidationItem {
        globals: parse_globals(root),
        stanza: parse_stanza(items[0], "item")?,
    })
}

fn parse_stanza(el: &Element, tag: &'static str) -> Result<Stanza, ConfigParseError> {
    let name = el
        .attr("name")
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(ConfigParseError::MissingName(tag))?;

    let mut params = BTreeMap::new();
    for child in &el.children {
        match child.name.as_str() {
            "param" => {
                let key = child.attr("name").ok_or(ConfigParseError::MissingName("param"))?;
                params.insert(key.to_string(), child.text.trim().to_string());
            }
            "param_list" => {
                let key = child
                    .attr("name")
                    .ok_or(ConfigParseError::MissingName("param_list"))?;
                let values: Vec<&str> = child
                    .children_named("value")
                    .map(|v| v.text.trim())
                    .collect();
                params.insert(key.to_string(), values.join(","));
            }
            _ => {}
        }
    }

    Ok(Stanza {
        name: name.to_string(),
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RUN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<input>
  <server_host>idx01</server_host>
  <server_uri>https://127.0.0.1:8089</server_uri>
  <session_key>abc123</session_key>
  <checkpoint_dir>/opt/host/var/lib/modinputs/web_ping</checkpoint_dir>
  <configuration>
    <stanza name="web_ping://first">
      <param name="url">https://example.com/?a=1&amp;b=2</param>
      <param name="interval">60</param>
      <param name="index">main</param>
    </stanza>
    <stanza name="web_ping://second">
      <param name="url">http://example.org</param>
      <param name="disabled">1</param>
    </stanza>
  </configuration>
</input>"#;

    const VALIDATE_XML: &str = r#"<items>
  <server_host>idx01</server_host>
  <server_uri>https://127.0.0.1:8089</server_uri>
  <session_key>abc123</session_key>
  <checkpoint_dir>/tmp/cp</checkpoint_dir>
  <item name="first">
    <param name="url">not-a-url</param>
    <param_list name="hosts">
      <value>a.example.com</value>
      <value>b.example.com</value>
    </param_list>
  </item>
</items>"#;

    #[test]
    fn parses_run_payload() {
        let cfg = parse_run(RUN_XML).unwrap();
        assert_eq!(cfg.globals.server_host.as_deref(), Some("idx01"));
        assert_eq!(cfg.globals.session_key.as_deref(), Some("abc123"));
        assert_eq!(
            cfg.globals.checkpoint_dir,
            Some(PathBuf::from("/opt/host/var/lib/modinputs/web_ping"))
        );
        assert_eq!(cfg.stanzas.len(), 2);

        let first = &cfg.stanzas[0];
        assert_eq!(first.name, "web_ping://first");
        assert_eq!(first.param("url"), Some("https://example.com/?a=1&b=2"));
        assert_eq!(first.index(), Some("main"));
        assert_eq!(first.scheme_name(), "web_ping");
        assert_eq!(first.instance_name(), "first");
        assert!(!first.is_disabled());
        assert!(cfg.stanzas[1].is_disabled());
    }

    #[test]
    fn parses_validation_payload_with_param_list() {
        let item = parse_validation(VALIDATE_XML).unwrap();
        assert_eq!(item.stanza.name, "first");
        assert_eq!(item.stanza.param("hosts"), Some("a.example.com,b.example.com"));
        assert_eq!(item.globals.checkpoint_dir, Some(PathBuf::from("/tmp/cp")));
    }

    #[test]
    fn mode_mismatch_is_reported() {
        let err = parse_run(VALIDATE_XML).unwrap_err();
        assert!(matches!(
            err,
            ConfigParseError::WrongMode {
                expected: "run",
                found: "validation"
            }
        ));
    }

    #[test]
    fn empty_configuration_is_valid() {
        let cfg = parse_run("<input><configuration/></input>").unwrap();
        assert!(cfg.stanzas.is_empty());
        assert_eq!(cfg.globals, GlobalSettings::default());
    }

    #[test]
    fn structural_errors_are_fatal() {
        assert!(matches!(
            parse_handshake("<input><server_host>x</server_host></input>"),
            Err(ConfigParseError::MissingElement("configuration"))
        ));
        assert!(matches!(
            parse_handshake("<something/>"),
            Err(ConfigParseError::UnexpectedRoot(root)) if root == "something"
        ));
        assert!(matches!(
            parse_handshake("<input><configuration><stanza><param name=\"a\">1</param></stanza></configuration></input>"),
            Err(ConfigParseError::MissingName("stanza"))
        ));
        assert!(matches!(
            parse_handshake("<items></items>"),
            Err(ConfigParseError::ItemCount(0))
        ));
        assert!(matches!(parse_handshake(""), Err(ConfigParseError::Empty)));
        assert!(matches!(
            parse_handshake("<input><configuration>"),
            Err(ConfigParseError::Xml(_))
        ));
    }

    #[test]
    fn duplicate_stanzas_are_rejected() {
        let xml = r#"<input><configuration>
            <stanza name="a://x"/>
            <stanza name="a://x"/>
        </configuration></input>"#;
        assert!(matches!(
            parse_run(xml),
            Err(ConfigParseError::DuplicateStanza(name)) if name == "a://x"
        ));
    }
}
