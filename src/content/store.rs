//! Content store - loads content records from the content directory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{ContentRecord, FrontMatter, FrontMatterError};
use crate::config::SiteConfig;
use crate::error::{ContentError, Result};

/// Outcome of loading a content tree.
///
/// Per-file failures land in `errors`; they never stop the other files
/// from loading.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Loaded records, ordered by path
    pub records: Vec<ContentRecord>,
    pub errors: Vec<ContentError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads content records from a root directory
pub struct ContentStore<'a> {
    root: PathBuf,
    config: &'a SiteConfig,
    exclude: Vec<glob::Pattern>,
}

impl<'a> ContentStore<'a> {
    /// Create a store over `root`
    pub fn new<P: AsRef<Path>>(root: P, config: &'a SiteConfig) -> Result<Self> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            config,
            exclude: config.exclude_patterns()?,
        })
    }

    /// Load every content file under the root
    pub fn load(&self) -> Result<LoadReport> {
        if !self.root.is_dir() {
            return Err(ContentError::RootNotFound(self.root.clone()));
        }

        let mut report = LoadReport::default();
        let mut records = Vec::new();

        for path in self.discover(&mut report.errors) {
            match self.load_file(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping {}", e);
                    report.errors.push(e);
                }
            }
        }

        records.sort_by(|a, b| a.path.cmp(&b.path));

        // First record (by path) owns a location; later ones are reported
        let mut owners: HashMap<String, PathBuf> = HashMap::new();
        for record in records {
            if let Some(existing) = owners.get(&record.location) {
                let err = ContentError::DuplicateRecord {
                    path: PathBuf::from(&record.path),
                    existing: existing.clone(),
                    location: record.location.clone(),
                };
                tracing::warn!("Skipping {}", err);
                report.errors.push(err);
                continue;
            }
            owners.insert(record.location.clone(), PathBuf::from(&record.path));
            report.records.push(record);
        }

        tracing::debug!(
            "Loaded {} records from {:?} ({} errors)",
            report.records.len(),
            self.root,
            report.errors.len()
        );

        Ok(report)
    }

    /// Find content files, collecting walk failures into `errors`
    pub fn discover(&self, errors: &mut Vec<ContentError>) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_ignored(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    tracing::warn!("Cannot walk {:?}: {}", path, e);
                    errors.push(ContentError::io(path, e.into()));
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_file() && self.is_content_file(path) {
                files.push(path.to_path_buf());
            }
        }

        files
    }

    /// Load a single content file
    pub fn load_file(&self, path: &Path) -> Result<ContentRecord> {
        let relative = self.relative_path(path);
        let content = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;

        let (fm, body) = FrontMatter::parse(&content).map_err(|e| match e {
            FrontMatterError::Unterminated { sentinel } => ContentError::UnterminatedMetadata {
                path: PathBuf::from(&relative),
                sentinel,
            },
            other => ContentError::MalformedRecord {
                path: PathBuf::from(&relative),
                reason: other.to_string(),
            },
        })?;

        tracing::trace!("Parsed {} ({} keys)", relative, fm.metadata.len());

        Ok(ContentRecord::new(
            relative,
            path.to_path_buf(),
            fm.format,
            fm.metadata,
            body.to_string(),
        ))
    }

    /// Path relative to the root, `/`-separated
    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn is_ignored(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.config.ignore_hidden && name.starts_with('.') {
            return true;
        }
        if self.config.ignore_underscore && entry.file_type().is_dir() && name.starts_with('_') {
            return true;
        }

        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        self.exclude.iter().any(|p| p.matches_path(relative))
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.is_content_extension(e))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str, body: &str) -> String {
        format!("+++\ntitle = \"{}\"\ndate = \"{}\"\n+++\n{}", title, date, body)
    }

    fn load(dir: &TempDir, config: &SiteConfig) -> LoadReport {
        ContentStore::new(dir.path(), config).unwrap().load().unwrap()
    }

    #[test]
    fn test_loads_hugo_scenario() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "posts/hugo.md",
            "+++\ntitle = \"Hugo\"\ndate = \"2019-03-06T00:57:32+05:30\"\n+++\nHello world.\n",
        );

        let report = load(&dir, &SiteConfig::default());
        assert!(report.is_clean());
        assert_eq!(report.records.len(), 1);

        let rec = &report.records[0];
        assert_eq!(rec.path, "posts/hugo.md");
        assert_eq!(rec.title(), Some("Hugo"));
        assert_eq!(rec.date(), Some("2019-03-06T00:57:32+05:30"));
        assert_eq!(rec.metadata.len(), 2);
        assert_eq!(rec.body, "Hello world.\n");
        assert_eq!(rec.full_path, dir.path().join("posts/hugo.md"));
    }

    #[test]
    fn test_bad_files_do_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.md", &post("A", "2020-01-01", "a\n"));
        write(dir.path(), "b.md", "+++\ntitle = \"B\"\n\nno closing sentinel\n");
        write(dir.path(), "c.md", "just prose, no metadata\n");
        write(dir.path(), "d.md", &post("D", "2020-01-02", "d\n"));

        let report = load(&dir, &SiteConfig::default());
        let paths: Vec<_> = report.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "d.md"]);
        assert_eq!(report.errors.len(), 2);

        assert!(report.errors.iter().any(|e| matches!(
            e,
            ContentError::UnterminatedMetadata { path, .. } if path == Path::new("b.md")
        )));
        assert!(report.errors.iter().any(|e| matches!(
            e,
            ContentError::MalformedRecord { path, .. } if path == Path::new("c.md")
        )));
    }

    #[test]
    fn test_identical_front_matter_stays_separate() {
        let dir = TempDir::new().unwrap();
        let draft = post("Serde deserialize", "2020-05-01", "Draft body.\n");
        let revised = post("Serde deserialize", "2020-05-01", "Revised body.\n");
        write(dir.path(), "posts/serde-deserialize.md", &draft);
        write(dir.path(), "posts/serde-deserialize-2.md", &revised);

        let report = load(&dir, &SiteConfig::default());
        assert!(report.is_clean());
        assert_eq!(report.records.len(), 2);
        assert_ne!(report.records[0].body, report.records[1].body);
        assert_eq!(report.records[0].metadata, report.records[1].metadata);
    }

    #[test]
    fn test_duplicate_location_reported() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "notes.markdown", &post("One", "2020-01-01", ""));
        write(dir.path(), "notes.md", &post("Two", "2020-01-02", ""));

        let report = load(&dir, &SiteConfig::default());
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].path, "notes.markdown");
        match &report.errors[..] {
            [ContentError::DuplicateRecord {
                path,
                existing,
                location,
            }] => {
                assert_eq!(path, Path::new("notes.md"));
                assert_eq!(existing, Path::new("notes.markdown"));
                assert_eq!(location, "/notes/");
            }
            other => panic!("unexpected errors: {:?}", other),
        }
    }

    #[test]
    fn test_symbol_named_files_keep_own_locations() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/!!!.md", &post("Bang", "2020-01-01", ""));
        write(dir.path(), "posts/???.md", &post("Huh", "2020-01-02", ""));

        let report = load(&dir, &SiteConfig::default());
        assert!(report.is_clean(), "unexpected errors: {:?}", report.errors);
        let locations: Vec<_> = report.records.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(locations, vec!["/posts/!!!/", "/posts/???/"]);
    }

    #[test]
    fn test_discovery_filters() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.md", &post("Keep", "2020-01-01", ""));
        write(dir.path(), "image.png", "not content");
        write(dir.path(), ".hidden.md", &post("Hidden", "2020-01-01", ""));
        write(dir.path(), ".git/notes.md", &post("Git", "2020-01-01", ""));
        write(dir.path(), "_drafts/wip.md", &post("Wip", "2020-01-01", ""));
        write(dir.path(), "drafts/old.md", &post("Old", "2020-01-01", ""));

        let config = SiteConfig {
            ignore_underscore: true,
            exclude: vec!["drafts/*".to_string()],
            ..Default::default()
        };
        let report = load(&dir, &config);
        let paths: Vec<_> = report.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["keep.md"]);

        let report = load(&dir, &SiteConfig::default());
        let paths: Vec<_> = report.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["_drafts/wip.md", "drafts/old.md", "keep.md"]);
    }

    #[test]
    fn test_metadata_only_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty.md", "+++\ntitle = \"Empty\"\ndate = \"2021-01-01\"\n+++\n");
        let report = load(&dir, &SiteConfig::default());
        assert!(report.is_clean());
        assert_eq!(report.records[0].body, "");
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let store = ContentStore::new(dir.path().join("nope"), &config).unwrap();
        assert!(matches!(store.load(), Err(ContentError::RootNotFound(_))));
    }

    #[test]
    fn test_load_file_twice_is_identical() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "x.md", &post("X", "2020-01-01", "body\n"));
        let config = SiteConfig::default();
        let store = ContentStore::new(dir.path(), &config).unwrap();
        let path = dir.path().join("x.md");
        assert_eq!(store.load_file(&path).unwrap(), store.load_file(&path).unwrap());
    }
}
