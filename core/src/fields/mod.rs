//! Typed field validators.
//!
//! A [`Field`] turns the raw string the host supplies for one parameter into a typed
//! [`Value`], or rejects it with a [`ValidationError`] that names the parameter.
//! The set of validator kinds is closed over [`FieldKind`]; every kind goes through
//! the same [`Field::validate`] entry point.

mod network;
mod value;

use std::path::PathBuf;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::error::{SchemeError, ValidationError};

pub use network::IpNetwork;
pub use value::Value;

lazy_static! {
    static ref DURATION_RE: Regex =
        Regex::new(r"(?i)^\s*(?P<duration>[0-9]+)\s*(?P<units>[a-z]*)\s*$").unwrap();
    static ref HOST_LABEL_RE: Regex =
        Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").unwrap();
}

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Data type hint advertised to the host in the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Number,
    Boolean,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "string" => Some(DataType::String),
            "number" => Some(DataType::Number),
            "boolean" => Some(DataType::Boolean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Boolean,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Float {
        min: Option<f64>,
        max: Option<f64>,
    },
    Url {
        allowed_schemes: Vec<String>,
    },
    List {
        delimiter: String,
        trim: bool,
        min_items: Option<usize>,
        max_items: Option<usize>,
        item: Option<Box<FieldKind>>,
    },
    /// The whole value must match `pattern` (anchored at construction).
    RegexMatch {
        pattern: Regex,
    },
    /// The value itself is a regular expression.
    Regex,
    /// The value is a `*` wildcard, converted to an anchored regex.
    Wildcard,
    Range {
        low: i64,
        high: i64,
    },
    StaticList {
        values: Vec<String>,
    },
    Duration,
    FilePath {
        must_exist: bool,
    },
    DomainName,
    IpNetwork,
    /// Accepted and ignored so old configurations keep validating.
    Deprecated,
    AnyOf {
        kinds: Vec<FieldKind>,
        message: Option<String>,
    },
}

impl FieldKind {
    pub fn integer() -> Self {
        FieldKind::Integer {
            min: None,
            max: None,
        }
    }

    pub fn float() -> Self {
        FieldKind::Float {
            min: None,
            max: None,
        }
    }

    /// http and https only.
    pub fn url() -> Self {
        FieldKind::Url {
            allowed_schemes: vec!["http".to_string(), "https".to_string()],
        }
    }

    pub fn list() -> Self {
        FieldKind::List {
            delimiter: ",".to_string(),
            trim: true,
            min_items: None,
            max_items: None,
            item: None,
        }
    }

    pub fn list_of(item: FieldKind) -> Self {
        FieldKind::List {
            delimiter: ",".to_string(),
            trim: true,
            min_items: None,
            max_items: None,
            item: Some(Box::new(item)),
        }
    }

    pub fn regex_match(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(FieldKind::RegexMatch { pattern: anchored })
    }

    pub fn static_list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldKind::StaticList {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            FieldKind::Boolean => DataType::Boolean,
            FieldKind::Integer { .. } | FieldKind::Float { .. } | FieldKind::Range { .. } => {
                DataType::Number
            }
            _ => DataType::String,
        }
    }

    /// Converts a non-empty raw value. Errors are the operator-facing message.
    fn convert(&self, name: &str, raw: &str) -> Result<Value, String> {
        match self {
            FieldKind::String => Ok(Value::Str(raw.to_string())),
            FieldKind::Boolean => parse_bool(raw).map(Value::Bool).ok_or_else(|| {
                format!(
                    "The value of '{}' for the '{}' parameter is not a valid boolean",
                    raw, name
                )
            }),
            FieldKind::Integer { min, max } => {
                let v: i64 = raw.trim().parse().map_err(|_| {
                    format!(
                        "The value of '{}' for the '{}' parameter is not a valid integer",
                        raw, name
                    )
                })?;
                check_bounds(name, raw, v, *min, *max)?;
                Ok(Value::Int(v))
            }
            FieldKind::Float { min, max } => {
                let v: f64 = raw
                    .trim()
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| {
                        format!(
                            "The value of '{}' for the '{}' parameter is not a valid number",
                            raw, name
                        )
                    })?;
                check_bounds(name, raw, v, *min, *max)?;
                Ok(Value::Float(v))
            }
            FieldKind::Range { low, high } => {
                let v: i64 = raw.trim().parse().map_err(|_| {
                    format!(
                        "The value of '{}' for the '{}' parameter is not a valid integer",
                        raw, name
                    )
                })?;
                check_bounds(name, raw, v, Some(*low), Some(*high))?;
                Ok(Value::Int(v))
            }
            FieldKind::Url { allowed_schemes } => parse_url(name, raw, allowed_schemes),
            FieldKind::List {
                delimiter,
                trim,
                min_items,
                max_items,
                item,
            } => {
                let mut entries: Vec<&str> = raw.split(delimiter.as_str()).collect();
                if *trim {
                    entries = entries.into_iter().map(str::trim).collect();
                }
                entries.retain(|e| !e.is_empty());

                if let Some(min) = min_items {
                    if entries.len() < *min {
                        return Err(format!(
                            "The '{}' parameter must contain at least {} entries (got {})",
                            name,
                            min,
                            entries.len()
                        ));
                    }
                }
                if let Some(max) = max_items {
                    if entries.len() > *max {
                        return Err(format!(
                            "The '{}' parameter must contain at most {} entries (got {})",
                            name,
                            max,
                            entries.len()
                        ));
                    }
                }

                let values = entries
                    .into_iter()
                    .map(|entry| match item {
                        Some(kind) => kind.convert(name, entry),
                        None => Ok(Value::Str(entry.to_string())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            FieldKind::RegexMatch { pattern } => {
                if pattern.is_match(raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(format!(
                        "The value of '{}' for the '{}' parameter does not match the pattern {}",
                        raw,
                        name,
                        pattern.as_str()
                    ))
                }
            }
            FieldKind::Regex => Regex::new(raw).map(Value::Regex).map_err(|e| {
                format!(
                    "The value of '{}' for the '{}' parameter is not a valid regular expression: {}",
                    raw, name, e
                )
            }),
            FieldKind::Wildcard => {
                let escaped = regex::escape(raw).replace(r"\*", ".*");
                Regex::new(&format!("^{}$", escaped))
                    .map(Value::Regex)
                    .map_err(|e| {
                        format!(
                            "The value of '{}' for the '{}' parameter is not a valid wildcard: {}",
                            raw, name, e
                        )
                    })
            }
            FieldKind::StaticList { values } => {
                if values.iter().any(|v| v == raw) {
                    Ok(Value::Str(raw.to_string()))
                } else {
                    Err(format!(
                        "The value of the '{}' field is invalid, it must be one of: {}",
                        name,
                        values.join(",")
                    ))
                }
            }
            FieldKind::Duration => parse_duration(raw)
                .map(Value::Duration)
                .map_err(|reason| match reason {
                    DurationError::Format => format!(
                        "The value of '{}' for the '{}' parameter is not a valid duration",
                        raw, name
                    ),
                    DurationError::Unit(unit) => format!(
                        "The unit '{}' for the '{}' parameter is not a valid unit of duration",
                        unit, name
                    ),
                }),
            FieldKind::FilePath { must_exist } => {
                let path = PathBuf::from(raw.trim());
                if *must_exist && !path.is_file() {
                    return Err(format!(
                        "The parameter '{}' is not a valid path; '{}' does not exist",
                        name,
                        path.display()
                    ));
                }
                Ok(Value::Path(path))
            }
            FieldKind::DomainName => {
                if is_valid_hostname(raw.trim()) {
                    Ok(Value::Str(raw.trim().to_string()))
                } else {
                    Err(format!(
                        "The value of '{}' for the '{}' parameter is not a valid domain name",
                        raw, name
                    ))
                }
            }
            FieldKind::IpNetwork => IpNetwork::parse(raw).map(Value::Network).map_err(|e| {
                format!(
                    "The value of '{}' for the '{}' parameter is not a valid network: {}",
                    raw, name, e
                )
            }),
            FieldKind::Deprecated => Ok(Value::Null),
            FieldKind::AnyOf { kinds, message } => {
                let mut messages = Vec::with_capacity(kinds.len());
                for kind in kinds {
                    match kind.convert(name, raw) {
                        Ok(v) => return Ok(v),
                        Err(m) => messages.push(m),
                    }
                }
                Err(message.clone().unwrap_or_else(|| messages.join(";")))
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn check_bounds<T>(name: &str, raw: &str, v: T, min: Option<T>, max: Option<T>) -> Result<(), String>
where
    T: PartialOrd + std::fmt::Display,
{
    if let Some(min) = min {
        if v < min {
            return Err(format!(
                "The value of '{}' for the '{}' parameter must be greater than or equal to '{}'",
                raw, name, min
            ));
        }
    }
    if let Some(max) = max {
        if v > max {
            return Err(format!(
                "The value of '{}' for the '{}' parameter must be less than or equal to '{}'",
                raw, name, max
            ));
        }
    }
    Ok(())
}

fn parse_url(name: &str, raw: &str, allowed_schemes: &[String]) -> Result<Value, String> {
    let url = Url::parse(raw.trim()).map_err(|_| {
        format!(
            "The value of '{}' for the '{}' parameter is not a valid URL",
            raw, name
        )
    })?;
    if url.host_str().map(str::is_empty).unwrap_or(true) {
        return Err(format!(
            "The value of '{}' for the '{}' parameter does not contain a host name",
            raw, name
        ));
    }
    if !allowed_schemes.iter().any(|s| s == url.scheme()) {
        return Err(format!(
            "The value of '{}' for the '{}' parameter does not contain a valid protocol (only {} are supported)",
            raw,
            name,
            allowed_schemes.join(" and ")
        ));
    }
    Ok(Value::Url(url))
}

#[derive(Debug)]
pub(crate) enum DurationError {
    Format,
    Unit(String),
}

/// Parses `"90"`, `"5m"`, `"1 d"`, `"2week"` into a duration.
pub(crate) fn parse_duration(raw: &str) -> Result<Duration, DurationError> {
    let caps = DURATION_RE.captures(raw).ok_or(DurationError::Format)?;
    let amount: u64 = caps["duration"]
        .parse()
        .map_err(|_| DurationError::Format)?;
    let units = caps["units"].to_ascii_lowercase();
    let scale = match units.as_str() {
        "" | "s" => 1,
        "m" | "min" | "minute" => MINUTE,
        "h" | "hour" => HOUR,
        "d" | "day" => DAY,
        "w" | "week" => WEEK,
        _ => return Err(DurationError::Unit(units)),
    };
    amount
        .checked_mul(scale)
        .map(Duration::from_secs)
        .ok_or(DurationError::Format)
}

fn is_valid_hostname(dn: &str) -> bool {
    let dn = dn.strip_suffix('.').unwrap_or(dn);
    if dn.is_empty() || dn.len() > 253 {
        return false;
    }
    dn.split('.').all(|label| HOST_LABEL_RE.is_match(label))
}

/// One declared parameter of a scheme.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    title: String,
    description: String,
    none_allowed: bool,
    empty_allowed: bool,
    required_on_create: bool,
    required_on_edit: bool,
    kind: FieldKind,
}

impl Field {
    /// A required field. Use [`Field::optional`] and [`Field::allow_empty`] to relax it.
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: FieldKind,
    ) -> Result<Self, SchemeError> {
        let name = name.into();
        let title = title.into();
        let description = description.into();
        if name.trim().is_empty() {
            return Err(SchemeError::Blank("name"));
        }
        if title.trim().is_empty() {
            return Err(SchemeError::Blank("title"));
        }
        if description.trim().is_empty() {
            return Err(SchemeError::Blank("description"));
        }

        Ok(Self {
            name,
            title,
            description,
            none_allowed: false,
            empty_allowed: false,
            required_on_create: true,
            required_on_edit: true,
            kind,
        })
    }

    /// A required field whose whole value must match `pattern`.
    pub fn matching(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, SchemeError> {
        let name = name.into();
        let kind = FieldKind::regex_match(pattern).map_err(|source| SchemeError::Pattern {
            field: name.clone(),
            source,
        })?;
        Self::new(name, title, description, kind)
    }

    pub fn optional(mut self) -> Self {
        self.none_allowed = true;
        self.empty_allowed = true;
        self.required_on_create = false;
        self.required_on_edit = false;
        self
    }

    pub fn allow_empty(mut self, allowed: bool) -> Self {
        self.empty_allowed = allowed;
        self
    }

    pub fn required_on_edit(mut self, required: bool) -> Self {
        self.required_on_edit = required;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn data_type(&self) -> DataType {
        self.kind.data_type()
    }

    pub fn is_required(&self) -> bool {
        !self.none_allowed
    }

    pub fn is_required_on_create(&self) -> bool {
        self.required_on_create
    }

    pub fn is_required_on_edit(&self) -> bool {
        self.required_on_edit
    }

    /// `Value::Null` means the optional field was not set.
    pub fn validate(&self, raw: Option<&str>) -> Result<Value, ValidationError> {
        if matches!(self.kind, FieldKind::Deprecated) {
            return Ok(Value::Null);
        }

        let Some(raw) = raw else {
            if self.none_allowed {
                return Ok(Value::Null);
            }
            return Err(self.empty_error());
        };

        if raw.trim().is_empty() {
            if !self.empty_allowed {
                return Err(self.empty_error());
            }
            return match self.kind {
                FieldKind::String => Ok(Value::Str(raw.to_string())),
                // Still subject to `min_items`.
                FieldKind::List { .. } => self
                    .kind
                    .convert(&self.name, raw.trim())
                    .map_err(|message| ValidationError::new(&self.name, message)),
                _ => Ok(Value::Null),
            };
        }

        self.kind
            .convert(&self.name, raw)
            .map_err(|message| ValidationError::new(&self.name, message))
    }

    fn empty_error(&self) -> ValidationError {
        ValidationError::new(
            &self.name,
            format!("The value for the '{}' parameter cannot be empty", self.name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind) -> Field {
        Field::new("param", "Param", "A parameter", kind).unwrap()
    }

    #[test]
    fn matching_fields_report_bad_patterns() {
        let f = Field::matching("code", "Code", "Two letters", "[A-Z]{2}").unwrap();
        assert!(f.validate(Some("AB")).is_ok());
        assert!(f.validate(Some("ABC")).is_err());

        let err = Field::matching("code", "Code", "Two letters", "([A-Z]").unwrap_err();
        assert!(matches!(err, SchemeError::Pattern { ref field, .. } if field == "code"));
    }

    #[test]
    fn blank_metadata_is_rejected() {
        assert!(matches!(
            Field::new(" ", "t", "d", FieldKind::String),
            Err(SchemeError::Blank("name"))
        ));
        assert!(matches!(
            Field::new("n", "t", "", FieldKind::String),
            Err(SchemeError::Blank("description"))
        ));
    }

    #[test]
    fn required_fields_reject_absent_and_empty() {
        let kinds = vec![
            FieldKind::String,
            FieldKind::Boolean,
            FieldKind::integer(),
            FieldKind::float(),
            FieldKind::url(),
            FieldKind::list(),
            FieldKind::regex_match("[a-z]+").unwrap(),
            FieldKind::Duration,
            FieldKind::IpNetwork,
        ];
        for kind in kinds {
            let f = field(kind);
            let err = f.validate(None).unwrap_err();
            assert_eq!(err.field, "param");
            assert!(f.validate(Some("")).is_err());
            assert!(f.validate(Some("   ")).is_err());
        }
    }

    #[test]
    fn optional_fields_accept_absence() {
        let f = field(FieldKind::integer()).optional();
        assert!(f.validate(None).unwrap().is_null());
        assert!(f.validate(Some("")).unwrap().is_null());
        assert!(!f.is_required_on_create());
    }

    #[test]
    fn string_allows_empty_only_when_declared() {
        let f = field(FieldKind::String).allow_empty(true);
        assert_eq!(f.validate(Some("")).unwrap().as_str(), Some(""));
        assert!(field(FieldKind::String).validate(Some("")).is_err());
    }

    #[test]
    fn boolean_variants() {
        let f = field(FieldKind::Boolean);
        for raw in ["true", "TRUE", "1", "Yes"] {
            assert_eq!(f.validate(Some(raw)).unwrap().as_bool(), Some(true), "{raw}");
        }
        for raw in ["false", "0", "NO"] {
            assert_eq!(f.validate(Some(raw)).unwrap().as_bool(), Some(false), "{raw}");
        }
        let err = f.validate(Some("maybe")).unwrap_err();
        assert!(err.message.contains("not a valid boolean"));
    }

    #[test]
    fn integer_bounds() {
        let f = field(FieldKind::Integer {
            min: Some(1),
            max: Some(10),
        });
        assert_eq!(f.validate(Some(" 7 ")).unwrap().as_int(), Some(7));
        assert!(f.validate(Some("0")).unwrap_err().message.contains("greater than"));
        assert!(f.validate(Some("11")).unwrap_err().message.contains("less than"));
        assert!(f.validate(Some("seven")).is_err());
    }

    #[test]
    fn float_rejects_non_finite() {
        let f = field(FieldKind::float());
        assert_eq!(f.validate(Some("2.5")).unwrap().as_float(), Some(2.5));
        assert!(f.validate(Some("NaN")).is_err());
        assert!(f.validate(Some("inf")).is_err());
    }

    #[test]
    fn range_is_inclusive() {
        let f = field(FieldKind::Range { low: 1, high: 5 });
        assert!(f.validate(Some("1")).is_ok());
        assert!(f.validate(Some("5")).is_ok());
        assert!(f.validate(Some("6")).is_err());
    }

    #[test]
    fn url_requires_scheme_and_host() {
        let f = field(FieldKind::url());
        let v = f.validate(Some(" https://example.com/path ")).unwrap();
        assert_eq!(v.as_url().unwrap().host_str(), Some("example.com"));
        assert!(f.validate(Some("not-a-url")).is_err());
        assert!(f
            .validate(Some("ftp://example.com"))
            .unwrap_err()
            .message
            .contains("valid protocol"));
    }

    #[test]
    fn list_splits_trims_and_counts() {
        let f = field(FieldKind::List {
            delimiter: ",".to_string(),
            trim: true,
            min_items: Some(2),
            max_items: Some(3),
            item: None,
        });
        let v = f.validate(Some("a, b ,c")).unwrap();
        let items: Vec<String> = v.as_list().unwrap().iter().map(Value::to_raw).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
        assert!(f.validate(Some("a")).is_err());
        assert!(f.validate(Some("a,b,c,d")).is_err());
    }

    #[test]
    fn empty_list_still_counts_entries() {
        let bounded = field(FieldKind::List {
            delimiter: ",".to_string(),
            trim: false,
            min_items: Some(1),
            max_items: None,
            item: None,
        })
        .optional();
        assert!(bounded.validate(None).unwrap().is_null());
        assert!(bounded.validate(Some("  ")).unwrap_err().message.contains("at least 1"));

        let open = field(FieldKind::list()).optional();
        let v = open.validate(Some(" ")).unwrap();
        assert!(v.as_list().unwrap().is_empty());
    }

    #[test]
    fn list_items_are_typed() {
        let f = field(FieldKind::list_of(FieldKind::IpNetwork));
        let v = f.validate(Some("10.0.0.0/28,1.2.3.4")).unwrap();
        let nets = v.as_list().unwrap();
        assert_eq!(nets[0].as_network().unwrap().num_addresses(), 16);
        assert!(f.validate(Some("10.0.0.0/28,bogus")).is_err());
    }

    #[test]
    fn regex_match_is_full_match() {
        let f = field(FieldKind::regex_match("[a-z]+").unwrap());
        assert!(f.validate(Some("abc")).is_ok());
        assert!(f.validate(Some("abc1")).is_err());
    }

    #[test]
    fn regex_and_wildcard_compile_the_value() {
        let f = field(FieldKind::Regex);
        assert!(f.validate(Some("a(b")).is_err());
        let w = field(FieldKind::Wildcard).validate(Some("web*.log")).unwrap();
        let re = w.as_regex().unwrap();
        assert!(re.is_match("web-01.log"));
        assert!(!re.is_match("db.log"));
    }

    #[test]
    fn static_list_membership() {
        let f = field(FieldKind::static_list(["json", "xml"]));
        assert!(f.validate(Some("xml")).is_ok());
        assert!(f.validate(Some("csv")).unwrap_err().message.contains("json,xml"));
    }

    #[test]
    fn durations() {
        let f = field(FieldKind::Duration);
        let secs = |raw: &str| f.validate(Some(raw)).unwrap().as_duration().unwrap().as_secs();
        assert_eq!(secs("30"), 30);
        assert_eq!(secs("5m"), 300);
        assert_eq!(secs("1 d"), 86_400);
        assert_eq!(secs("2w"), 2 * WEEK);
        assert!(f.validate(Some("5 fortnights")).unwrap_err().message.contains("unit"));
        assert!(f.validate(Some("soon")).is_err());
    }

    #[test]
    fn domain_names() {
        let f = field(FieldKind::DomainName);
        assert!(f.validate(Some("example.com.")).is_ok());
        assert!(f.validate(Some("-bad.example.com")).is_err());
        assert!(f.validate(Some("under_score.com")).is_err());
    }

    #[test]
    fn file_path_existence() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let raw = file.path().display().to_string();
        let f = field(FieldKind::FilePath { must_exist: true });
        assert!(f.validate(Some(raw.as_str())).is_ok());
        assert!(f.validate(Some("/definitely/not/here.txt")).is_err());
    }

    #[test]
    fn deprecated_is_always_accepted() {
        let f = field(FieldKind::Deprecated);
        assert!(f.validate(None).unwrap().is_null());
        assert!(f.validate(Some("whatever")).unwrap().is_null());
    }

    #[test]
    fn any_of_tries_each_kind() {
        let f = field(FieldKind::AnyOf {
            kinds: vec![FieldKind::IpNetwork, FieldKind::DomainName],
            message: None,
        });
        assert!(f.validate(Some("10.0.0.1")).unwrap().as_network().is_some());
        assert_eq!(f.validate(Some("example.com")).unwrap().as_str(), Some("example.com"));
        let err = f.validate(Some("bad host!")).unwrap_err();
        assert!(err.message.contains(';'));

        let custom = field(FieldKind::AnyOf {
            kinds: vec![FieldKind::IpNetwork],
            message: Some("must be an address".to_string()),
        });
        assert_eq!(custom.validate(Some("x")).unwrap_err().message, "must be an address");
    }

    #[test]
    fn data_type_hints() {
        assert_eq!(field(FieldKind::Boolean).data_type(), DataType::Boolean);
        assert_eq!(field(FieldKind::Range { low: 0, high: 1 }).data_type(), DataType::Number);
        assert_eq!(field(FieldKind::url()).data_type(), DataType::String);
    }
}
