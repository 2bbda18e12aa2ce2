//! Data-quality warnings over a loaded batch of records
//!
//! Lints never change the records. Two posts sharing a title are both
//! kept; the warning only points at them.

use chrono_tz::Tz;
use indexmap::IndexMap;
use std::fmt;

use super::metadata::{DATE, TAGS, TITLE};
use super::{ContentRecord, MetaValue};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lint {
    /// Several records share one title
    DuplicateTitle { title: String, paths: Vec<String> },
    /// A recognized field is absent or blank
    MissingField { path: String, field: &'static str },
    /// A text field holds a non-text value, e.g. `date = 2020`
    WrongType {
        path: String,
        field: &'static str,
        found: &'static str,
    },
    /// `date` is present but not a recognizable timestamp
    InvalidDate { path: String, value: String },
    /// `tags` is not a list of strings
    InvalidTags { path: String, found: &'static str },
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::DuplicateTitle { title, paths } => {
                write!(f, "title {:?} is shared by {}", title, paths.join(", "))
            }
            Lint::MissingField { path, field } => write!(f, "{}: missing `{}`", path, field),
            Lint::WrongType { path, field, found } => {
                write!(f, "{}: `{}` should be a string, found {}", path, field, found)
            }
            Lint::InvalidDate { path, value } => {
                write!(f, "{}: unrecognized date {:?}", path, value)
            }
            Lint::InvalidTags { path, found } => {
                write!(f, "{}: `tags` should be a list of strings, found {}", path, found)
            }
        }
    }
}

/// `field` is set to something other than text (null counts as unset)
fn wrong_type(record: &ContentRecord, field: &'static str) -> Option<Lint> {
    match record.metadata.get(field)? {
        MetaValue::Null | MetaValue::String(_) | MetaValue::Datetime(_) => None,
        other => Some(Lint::WrongType {
            path: record.path.clone(),
            field,
            found: other.kind(),
        }),
    }
}

/// Check a batch of records
pub fn lint(records: &[ContentRecord], tz: Option<Tz>) -> Vec<Lint> {
    let mut lints = Vec::new();
    let mut titles: IndexMap<&str, Vec<String>> = IndexMap::new();

    for record in records {
        if let Some(lint) = wrong_type(record, TITLE) {
            lints.push(lint);
        } else {
            match record.title().map(str::trim) {
                Some(title) if !title.is_empty() => {
                    titles.entry(title).or_default().push(record.path.clone());
                }
                _ => lints.push(Lint::MissingField {
                    path: record.path.clone(),
                    field: TITLE,
                }),
            }
        }

        if let Some(lint) = wrong_type(record, DATE) {
            lints.push(lint);
        } else {
            match record.date() {
                Some(date) if !date.trim().is_empty() => {
                    if record.parse_date(tz).is_err() {
                        lints.push(Lint::InvalidDate {
                            path: record.path.clone(),
                            value: date.to_string(),
                        });
                    }
                }
                _ => lints.push(Lint::MissingField {
                    path: record.path.clone(),
                    field: DATE,
                }),
            }
        }

        if let Some(tags) = record.metadata.get(TAGS) {
            if !tags.is_string_list() {
                let found = if tags.as_list().is_some() {
                    "a list with non-string items"
                } else {
                    tags.kind()
                };
                lints.push(Lint::InvalidTags {
                    path: record.path.clone(),
                    found,
                });
            }
        }
    }

    for (title, paths) in titles {
        if paths.len() > 1 {
            lints.push(Lint::DuplicateTitle {
                title: title.to_string(),
                paths,
            });
        }
    }

    for lint in &lints {
        tracing::debug!("lint: {}", lint);
    }

    lints
}
