//! Site configuration (sitestore.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::FrontMatterFormat;
use crate::error::ContentError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    pub content_dir: String,
    pub extensions: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub ignore_hidden: bool,
    pub ignore_underscore: bool,

    // Dates
    pub timezone: String,

    // Writing
    pub default_format: FrontMatterFormat,
    pub new_post_name: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            extensions: vec!["md".to_string(), "markdown".to_string()],
            exclude: Vec::new(),
            ignore_hidden: true,
            ignore_underscore: false,

            timezone: String::new(),

            default_format: FrontMatterFormat::Toml,
            new_post_name: ":title.md".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, mid-walk
    pub fn validate(&self) -> std::result::Result<(), ContentError> {
        self.exclude_patterns()?;
        self.tz()?;
        if self.extensions.is_empty() {
            return Err(ContentError::Config(
                "`extensions` must list at least one file extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiled `exclude` globs
    pub fn exclude_patterns(&self) -> std::result::Result<Vec<glob::Pattern>, ContentError> {
        self.exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p)
                    .map_err(|e| ContentError::Config(format!("invalid exclude {:?}: {}", p, e)))
            })
            .collect()
    }

    /// Timezone applied to dates without an offset; `None` means UTC
    pub fn tz(&self) -> std::result::Result<Option<chrono_tz::Tz>, ContentError> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(None);
        }
        name.parse::<chrono_tz::Tz>()
            .map(Some)
            .map_err(|e| ContentError::Config(format!("invalid timezone {:?}: {}", name, e)))
    }

    /// Whether a file extension marks a content file
    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}
