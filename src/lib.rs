//! sitestore: front-matter content records for a static site
//!
//! This crate reads a directory of markdown content files, each opened by
//! a `+++` (TOML) or `---` (YAML) metadata block, and hands them to a
//! static-site generator as a flat set of content records.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentStore, LoadReport};

/// Name of the optional configuration file at the site root
pub const CONFIG_FILE: &str = "sitestore.yml";

/// A site: its configuration and content directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            tracing::debug!("Loading configuration from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Content store over the content directory
    pub fn store(&self) -> Result<ContentStore<'_>> {
        Ok(ContentStore::new(&self.content_dir, &self.config)?)
    }

    /// Load every content record
    pub fn load(&self) -> Result<LoadReport> {
        Ok(self.store()?.load()?)
    }

    /// Timezone for dates without an offset
    pub fn tz(&self) -> Result<Option<chrono_tz::Tz>> {
        Ok(self.config.tz()?)
    }
}
