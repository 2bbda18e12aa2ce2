//! Open, ordered metadata mapping read from a front-matter block
//!
//! No schema is enforced: every key found in the block is kept, in the
//! order it was written. The recognized keys (`title`, `date`, `tags`,
//! `description`) only get typed accessors on top of the raw values.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

pub const TITLE: &str = "title";
pub const DATE: &str = "date";
pub const TAGS: &str = "tags";
pub const DESCRIPTION: &str = "description";

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Unquoted TOML datetime as RFC 3339 text. A space separator is
    /// normalized to `T`.
    Datetime(String),
    List(Vec<MetaValue>),
    Table(Metadata),
}

impl MetaValue {
    /// String view of textual values (strings and raw datetimes)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) | MetaValue::Datetime(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is a list made only of strings
    pub fn is_string_list(&self) -> bool {
        self.as_list()
            .map(|items| items.iter().all(|i| matches!(i, MetaValue::String(_))))
            .unwrap_or(false)
    }

    /// Human-readable type name used in lint messages
    pub fn kind(&self) -> &'static str {
        match self {
            MetaValue::Null => "null",
            MetaValue::String(_) => "string",
            MetaValue::Integer(_) => "integer",
            MetaValue::Float(_) => "float",
            MetaValue::Boolean(_) => "boolean",
            MetaValue::Datetime(_) => "datetime",
            MetaValue::List(_) => "list",
            MetaValue::Table(_) => "table",
        }
    }

    pub(crate) fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => MetaValue::String(s),
            toml::Value::Integer(i) => MetaValue::Integer(i),
            toml::Value::Float(f) => MetaValue::Float(f),
            toml::Value::Boolean(b) => MetaValue::Boolean(b),
            toml::Value::Datetime(dt) => MetaValue::Datetime(dt.to_string()),
            toml::Value::Array(items) => {
                MetaValue::List(items.into_iter().map(MetaValue::from_toml).collect())
            }
            toml::Value::Table(table) => MetaValue::Table(Metadata::from_toml(table)),
        }
    }

    /// TOML has no null; `None` means the value is dropped
    pub(crate) fn to_toml(&self) -> Option<toml::Value> {
        let value = match self {
            MetaValue::Null => return None,
            MetaValue::String(s) => toml::Value::String(s.clone()),
            MetaValue::Integer(i) => toml::Value::Integer(*i),
            MetaValue::Float(f) => toml::Value::Float(*f),
            MetaValue::Boolean(b) => toml::Value::Boolean(*b),
            MetaValue::Datetime(s) => match s.parse::<toml::value::Datetime>() {
                Ok(dt) => toml::Value::Datetime(dt),
                Err(_) => toml::Value::String(s.clone()),
            },
            MetaValue::List(items) => {
                toml::Value::Array(items.iter().filter_map(MetaValue::to_toml).collect())
            }
            MetaValue::Table(table) => toml::Value::Table(table.to_toml()),
        };
        Some(value)
    }

    pub(crate) fn from_yaml(value: serde_yaml::Value) -> Result<Self, String> {
        let value = match value {
            serde_yaml::Value::Null => MetaValue::Null,
            serde_yaml::Value::Bool(b) => MetaValue::Boolean(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Integer(i),
                None => MetaValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => MetaValue::String(s),
            serde_yaml::Value::Sequence(items) => MetaValue::List(
                items
                    .into_iter()
                    .map(MetaValue::from_yaml)
                    .collect::<Result<_, _>>()?,
            ),
            serde_yaml::Value::Mapping(mapping) => MetaValue::Table(Metadata::from_yaml(mapping)?),
            serde_yaml::Value::Tagged(tagged) => MetaValue::from_yaml(tagged.value)?,
        };
        Ok(value)
    }

    pub(crate) fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            MetaValue::Null => serde_yaml::Value::Null,
            MetaValue::String(s) | MetaValue::Datetime(s) => serde_yaml::Value::String(s.clone()),
            MetaValue::Integer(i) => serde_yaml::Value::Number((*i).into()),
            MetaValue::Float(f) => serde_yaml::Value::Number((*f).into()),
            MetaValue::Boolean(b) => serde_yaml::Value::Bool(*b),
            MetaValue::List(items) => {
                serde_yaml::Value::Sequence(items.iter().map(MetaValue::to_yaml).collect())
            }
            MetaValue::Table(table) => serde_yaml::Value::Mapping(table.to_yaml()),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Null => f.write_str("null"),
            MetaValue::String(s) | MetaValue::Datetime(s) => f.write_str(s),
            MetaValue::Integer(i) => write!(f, "{}", i),
            MetaValue::Float(x) => write!(f, "{}", x),
            MetaValue::Boolean(b) => write!(f, "{}", b),
            MetaValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            MetaValue::Table(table) => write!(f, "{{{} keys}}", table.len()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(items: Vec<String>) -> Self {
        MetaValue::List(items.into_iter().map(MetaValue::String).collect())
    }
}

/// Ordered key/value metadata of a content record.
///
/// Equality ignores key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata(IndexMap<String, MetaValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        self.0.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display title
    pub fn title(&self) -> Option<&str> {
        self.get(TITLE).and_then(MetaValue::as_str)
    }

    /// Raw date text, exactly as written
    pub fn date(&self) -> Option<&str> {
        self.get(DATE).and_then(MetaValue::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(DESCRIPTION).and_then(MetaValue::as_str)
    }

    /// Tags as strings. A lone string counts as a single tag and
    /// non-string list items are skipped.
    pub fn tags(&self) -> Vec<&str> {
        match self.get(TAGS) {
            Some(MetaValue::String(s)) => vec![s.as_str()],
            Some(MetaValue::List(items)) => items.iter().filter_map(MetaValue::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub(crate) fn from_toml(table: toml::Table) -> Self {
        Self(
            table
                .into_iter()
                .map(|(k, v)| (k, MetaValue::from_toml(v)))
                .collect(),
        )
    }

    pub(crate) fn to_toml(&self) -> toml::Table {
        self.0
            .iter()
            .filter_map(|(k, v)| v.to_toml().map(|v| (k.clone(), v)))
            .collect()
    }

    pub(crate) fn from_yaml(mapping: serde_yaml::Mapping) -> Result<Self, String> {
        let mut metadata = Metadata::new();
        for (key, value) in mapping {
            let key = match key {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                other => return Err(format!("unsupported metadata key {:?}", other)),
            };
            metadata.0.insert(key, MetaValue::from_yaml(value)?);
        }
        Ok(metadata)
    }

    pub(crate) fn to_yaml(&self) -> serde_yaml::Mapping {
        self.0
            .iter()
            .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.to_yaml()))
            .collect()
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a MetaValue);
    type IntoIter = indexmap::map::Iter<'a, String, MetaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
