//! Content record model

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::date::parse_date;
use super::{FrontMatterFormat, Metadata};
use crate::error::{ContentError, Result};

/// One content file: its metadata block and raw body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// Source path relative to the content root, `/`-separated
    pub path: String,

    /// Full source file path
    #[serde(skip)]
    pub full_path: PathBuf,

    /// Where the generator would publish this record
    pub location: String,

    /// Front-matter dialect of the source file
    pub format: FrontMatterFormat,

    pub metadata: Metadata,

    /// Raw markdown body, never interpreted here
    pub body: String,
}

impl ContentRecord {
    /// Create a record; the published location is derived from the path
    pub fn new(
        path: String,
        full_path: PathBuf,
        format: FrontMatterFormat,
        metadata: Metadata,
        body: String,
    ) -> Self {
        let location = published_location(&path, &metadata);
        Self {
            path,
            full_path,
            location,
            format,
            metadata,
            body,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.title()
    }

    /// Raw date text
    pub fn date(&self) -> Option<&str> {
        self.metadata.date()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.metadata.tags()
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description()
    }

    /// Parse the `date` field. Missing dates are `Ok(None)`.
    pub fn parse_date(&self, tz: Option<Tz>) -> Result<Option<DateTime<FixedOffset>>> {
        let Some(raw) = self.date() else {
            return Ok(None);
        };
        parse_date(raw, tz)
            .map(Some)
            .ok_or_else(|| ContentError::InvalidDate {
                path: PathBuf::from(&self.path),
                value: raw.to_string(),
            })
    }
}

/// Site-relative directory a record is published to.
///
/// Uses the `slug` metadata value when present, otherwise the file stem.
/// An `index` file publishes to its parent directory. Names that slugify
/// to nothing (e.g. `!!!.md`) fall back to the trimmed raw stem so each
/// file keeps its own location.
pub fn published_location(path: &str, metadata: &Metadata) -> String {
    let path = Path::new(path);
    let parent = path
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();

    let stem = path.file_stem().map(|s| s.to_string_lossy());
    let name = metadata
        .get("slug")
        .and_then(|v| v.as_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .or_else(|| match stem.as_deref() {
            None | Some("index") => None,
            Some(stem) => {
                let slugged = slug::slugify(stem);
                if slugged.is_empty() {
                    Some(stem.trim().to_string())
                } else {
                    Some(slugged)
                }
            }
        });

    let mut location = String::from("/");
    if !parent.is_empty() {
        location.push_str(&parent);
        location.push('/');
    }
    if let Some(name) = name {
        location.push_str(&name);
        location.push('/');
    }
    location
}
