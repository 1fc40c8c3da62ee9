use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use url::Url;

use super::network::IpNetwork;

/// A validated, typed parameter value.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Url(Url),
    List(Vec<Value>),
    Regex(Regex),
    Duration(Duration),
    Path(PathBuf),
    Network(IpNetwork),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Value::Url(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Value::Regex(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_network(&self) -> Option<&IpNetwork> {
        match self {
            Value::Network(n) => Some(n),
            _ => None,
        }
    }

    /// Renders the value back into the string form the host stores.
    pub fn to_raw(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Str(s) => s.clone(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Url(u) => u.as_str().to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::to_raw)
                .collect::<Vec<_>>()
                .join(","),
            Value::Regex(r) => r.as_str().to_string(),
            Value::Duration(d) => d.as_secs().to_string(),
            Value::Path(p) => p.display().to_string(),
            Value::Network(n) => n.to_string(),
        }
    }
}
