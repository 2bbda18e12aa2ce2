//! Front-matter parsing

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::Metadata;

/// Front-matter dialect, chosen by the sentinel line that opens the block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontMatterFormat {
    /// TOML block fenced by `+++`
    #[default]
    Toml,
    /// YAML block fenced by `---`
    Yaml,
}

impl FrontMatterFormat {
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::Toml => "+++",
            Self::Yaml => "---",
        }
    }

    fn from_sentinel(line: &str) -> Option<Self> {
        match line {
            "+++" => Some(Self::Toml),
            "---" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse_block(&self, block: &str) -> Result<Metadata, FrontMatterError> {
        if block.trim().is_empty() {
            return Ok(Metadata::new());
        }

        match self {
            Self::Toml => toml::from_str::<toml::Table>(block)
                .map(Metadata::from_toml)
                .map_err(|e| self.syntax(e.message())),
            Self::Yaml => match serde_yaml::from_str::<serde_yaml::Value>(block) {
                Ok(serde_yaml::Value::Mapping(mapping)) => {
                    Metadata::from_yaml(mapping).map_err(|e| self.syntax(e))
                }
                Ok(serde_yaml::Value::Null) => Ok(Metadata::new()),
                Ok(_) => Err(self.syntax("expected key/value pairs")),
                Err(e) => Err(self.syntax(e.to_string())),
            },
        }
    }

    fn syntax(&self, message: impl Into<String>) -> FrontMatterError {
        FrontMatterError::Syntax {
            format: *self,
            message: message.into(),
        }
    }
}

impl fmt::Display for FrontMatterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => f.write_str("toml"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

impl std::str::FromStr for FrontMatterFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "toml" | "+++" => Ok(Self::Toml),
            "yaml" | "yml" | "---" => Ok(Self::Yaml),
            other => Err(format!("unknown front-matter format: {}", other)),
        }
    }
}

/// Front-matter failures. These carry no path; the store attaches one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrontMatterError {
    #[error("no metadata block at the start of the file")]
    NoMetadata,

    #[error("missing closing `{sentinel}`")]
    Unterminated { sentinel: &'static str },

    #[error("invalid {format} metadata: {message}")]
    Syntax {
        format: FrontMatterFormat,
        message: String,
    },

    #[error("cannot write {format} metadata: {message}")]
    Render {
        format: FrontMatterFormat,
        message: String,
    },
}

/// Metadata block of a content file
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub format: FrontMatterFormat,
    pub metadata: Metadata,
}

impl FrontMatter {
    pub fn new(format: FrontMatterFormat, metadata: Metadata) -> Self {
        Self { format, metadata }
    }

    /// Split content into front-matter and body.
    ///
    /// The block must open on the first non-blank line and close on the
    /// next line holding the same sentinel. One blank line right after the
    /// closing sentinel separates the block from the body and is dropped.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split_inclusive('\n');
        let mut offset = 0;

        let format = loop {
            let Some(line) = lines.next() else {
                return Err(FrontMatterError::NoMetadata);
            };
            offset += line.len();
            if line.trim().is_empty() {
                continue;
            }
            match FrontMatterFormat::from_sentinel(line.trim_end()) {
                Some(format) => break format,
                None => return Err(FrontMatterError::NoMetadata),
            }
        };

        let block_start = offset;
        for line in lines {
            let line_start = offset;
            offset += line.len();
            if line.trim_end() == format.sentinel() {
                let metadata = format.parse_block(&content[block_start..line_start])?;
                let body = strip_separator(&content[offset..]);
                return Ok((Self::new(format, metadata), body));
            }
        }

        Err(FrontMatterError::Unterminated {
            sentinel: format.sentinel(),
        })
    }

    /// Render the block, sentinels included
    pub fn render(&self) -> Result<String, FrontMatterError> {
        let inner = match self.format {
            FrontMatterFormat::Toml => {
                toml::to_string(&self.metadata.to_toml()).map_err(|e| FrontMatterError::Render {
                    format: self.format,
                    message: e.to_string(),
                })?
            }
            FrontMatterFormat::Yaml if self.metadata.is_empty() => String::new(),
            FrontMatterFormat::Yaml => serde_yaml::to_string(&self.metadata.to_yaml()).map_err(
                |e| FrontMatterError::Render {
                    format: self.format,
                    message: e.to_string(),
                },
            )?,
        };

        let sentinel = self.format.sentinel();
        let mut out = String::with_capacity(inner.len() + 8);
        out.push_str(sentinel);
        out.push('\n');
        out.push_str(&inner);
        if !inner.is_empty() && !inner.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(sentinel);
        out.push('\n');
        Ok(out)
    }

    /// Render a whole file: block, blank separator line, body
    pub fn to_document(&self, body: &str) -> Result<String, FrontMatterError> {
        let mut out = self.render()?;
        if !body.is_empty() {
            out.push('\n');
            out.push_str(body);
        }
        Ok(out)
    }
}

fn strip_separator(body: &str) -> &str {
    match body.split_once('\n') {
        Some((first, rest)) if first.trim().is_empty() => rest,
        _ => body,
    }
}
