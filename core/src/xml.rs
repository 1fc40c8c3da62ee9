//! Minimal element tree over `quick-xml`, enough for the handshake and scheme documents.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug)]
pub(crate) enum XmlError {
    Empty,
    Malformed(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| XmlError::Malformed(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| XmlError::Malformed(err.to_string()))?
                .into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name,
            attrs,
            ..Self::default()
        })
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of a direct child, if present.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }
}

pub(crate) fn parse_document(input: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Element::from_start(&e)?),
            Ok(Event::Empty(e)) => {
                let el = Element::from_start(&e)?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::End(_)) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, el)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|err| XmlError::Malformed(err.to_string()))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(XmlError::Malformed(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    err
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or(XmlError::Empty)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(el);
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::Malformed("multiple root elements".to_string()));
    }
    *root = Some(el);
    Ok(())
}

/// Escapes markup and drops characters XML 1.0 cannot carry.
pub(crate) fn escape(s: &str) -> Cow<'_, str> {
    if s.chars().any(is_forbidden) {
        let kept: String = s.chars().filter(|c| !is_forbidden(*c)).collect();
        return Cow::Owned(quick_xml::escape::escape(&kept).into_owned());
    }
    quick_xml::escape::escape(s)
}

fn is_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}
