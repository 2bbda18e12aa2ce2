//! Create a new content file

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local};
use std::fs;
use std::path::PathBuf;

use crate::content::{metadata, FrontMatter, FrontMatterFormat, Metadata};
use crate::Site;

/// Options for a new content file
#[derive(Debug, Default)]
pub struct NewRecord<'a> {
    pub title: &'a str,
    pub format: Option<FrontMatterFormat>,
    pub tags: Vec<String>,
    pub description: Option<&'a str>,
    /// File name without extension, instead of `new_post_name`
    pub path: Option<&'a str>,
}

/// Create a new content file and return its path
pub fn create_record(site: &Site, opts: &NewRecord<'_>) -> Result<PathBuf> {
    create_record_at(site, opts, Local::now().fixed_offset())
}

/// Create a new content file stamped with `now`
pub fn create_record_at(
    site: &Site,
    opts: &NewRecord<'_>,
    now: DateTime<FixedOffset>,
) -> Result<PathBuf> {
    if opts.title.trim().is_empty() {
        anyhow::bail!("Title must not be empty");
    }

    let filename = match opts.path {
        Some(p) => format!("{}.md", p),
        None => {
            let slug = slug::slugify(opts.title);
            site.config
                .new_post_name
                .replace(":title", &slug)
                .replace(":year", &now.format("%Y").to_string())
                .replace(":month", &now.format("%m").to_string())
                .replace(":day", &now.format("%d").to_string())
        }
    };
    let file_path = site.content_dir.join(&filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut meta = Metadata::new();
    meta.insert(metadata::TITLE, opts.title);
    meta.insert(metadata::DATE, now.to_rfc3339());
    if !opts.tags.is_empty() {
        meta.insert(metadata::TAGS, opts.tags.clone());
    }
    if let Some(description) = opts.description {
        meta.insert(metadata::DESCRIPTION, description);
    }

    let format = opts.format.unwrap_or(site.config.default_format);
    let content = FrontMatter::new(format, meta).render()?;

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}
