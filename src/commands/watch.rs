//! Re-check content whenever the content tree changes

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use super::check::{self, CheckSummary};
use crate::{Site, CONFIG_FILE};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Run one check pass, reloading configuration first.
///
/// Returns the reloaded site so the caller can follow a `content_dir`
/// change in `sitestore.yml`.
fn recheck(base_dir: &Path, strict: bool) -> Result<(Site, CheckSummary)> {
    let site = Site::new(base_dir)?;
    let summary = check::check(&site)?;
    check::print(&summary);
    if !summary.passed(strict) {
        tracing::warn!("Check failed");
    }
    Ok((site, summary))
}

/// Move the recursive watch from `watched` to `next` if they differ.
///
/// The new directory is watched before the old one is released, so a
/// failure leaves the previous watch in place. Returns whether it moved.
fn follow_content_dir<W: Watcher + ?Sized>(
    watcher: &mut W,
    watched: &mut PathBuf,
    next: &Path,
) -> Result<bool> {
    if watched.as_path() == next {
        return Ok(false);
    }

    watcher.watch(next, RecursiveMode::Recursive)?;
    if let Err(e) = watcher.unwatch(watched) {
        tracing::debug!("Cannot unwatch {:?}: {}", watched, e);
    }
    tracing::info!("Content directory moved, now watching {:?}", next);
    *watched = next.to_path_buf();
    Ok(true)
}

/// Handle one batch of changes: re-check and follow the content directory
fn on_change<W: Watcher + ?Sized>(
    watcher: &mut W,
    watched: &mut PathBuf,
    base_dir: &Path,
    strict: bool,
) -> Result<CheckSummary> {
    let (site, summary) = recheck(base_dir, strict)?;
    follow_content_dir(watcher, watched, &site.content_dir)?;
    Ok(summary)
}

/// Watch the content directory and config file until Ctrl+C
pub async fn run(site: &Site, strict: bool) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut debouncer = new_debouncer(DEBOUNCE, move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    let mut watched = site.content_dir.clone();
    debouncer
        .watcher()
        .watch(&watched, RecursiveMode::Recursive)?;

    let config_path = site.base_dir.join(CONFIG_FILE);
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    if let Err(e) = on_change(debouncer.watcher(), &mut watched, &site.base_dir, strict) {
        tracing::error!("Check failed: {}", e);
    }
    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", watched);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(Ok(events)) => {
                    tracing::info!("{} paths changed, checking...", events.len());
                    if let Err(e) = on_change(debouncer.watcher(), &mut watched, &site.base_dir, strict) {
                        tracing::error!("Check failed: {}", e);
                    }
                }
                Some(Err(e)) => tracing::error!("Watch error: {:?}", e),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::{EventHandler, WatcherKind};
    use std::fs;

    /// Watcher that only records which paths are watched
    #[derive(Default)]
    struct RecordingWatcher {
        watched: Vec<PathBuf>,
    }

    impl Watcher for RecordingWatcher {
        fn new<F: EventHandler>(_handler: F, _config: notify::Config) -> notify::Result<Self> {
            Ok(Self::default())
        }

        fn watch(&mut self, path: &Path, _mode: RecursiveMode) -> notify::Result<()> {
            if !path.is_dir() {
                return Err(notify::Error::path_not_found().add_path(path.to_path_buf()));
            }
            self.watched.push(path.to_path_buf());
            Ok(())
        }

        fn unwatch(&mut self, path: &Path) -> notify::Result<()> {
            match self.watched.iter().position(|p| p == path) {
                Some(i) => {
                    self.watched.remove(i);
                    Ok(())
                }
                None => Err(notify::Error::watch_not_found()),
            }
        }

        fn kind() -> WatcherKind {
            WatcherKind::NullWatcher
        }
    }

    fn post(title: &str) -> String {
        format!("+++\ntitle = \"{}\"\ndate = \"2020-01-01\"\n+++\n", title)
    }

    #[test]
    fn test_follows_moved_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("posts")).unwrap();
        fs::create_dir_all(base.join("notes")).unwrap();
        fs::write(base.join("posts/a.md"), post("A")).unwrap();
        fs::write(base.join("notes/b.md"), post("B")).unwrap();
        fs::write(base.join("notes/c.md"), post("C")).unwrap();
        fs::write(base.join(CONFIG_FILE), "content_dir: posts\n").unwrap();

        let mut watcher = RecordingWatcher::default();
        let mut watched = base.join("posts");
        watcher.watch(&watched, RecursiveMode::Recursive).unwrap();

        let summary = on_change(&mut watcher, &mut watched, base, false).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(watched, base.join("posts"));
        assert_eq!(watcher.watched, vec![base.join("posts")]);

        fs::write(base.join(CONFIG_FILE), "content_dir: notes\n").unwrap();
        let summary = on_change(&mut watcher, &mut watched, base, false).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(watched, base.join("notes"));
        assert_eq!(watcher.watched, vec![base.join("notes")]);
    }

    #[test]
    fn test_failed_move_keeps_old_watch() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("content");
        fs::create_dir_all(&old).unwrap();

        let mut watcher = RecordingWatcher::default();
        let mut watched = old.clone();
        watcher.watch(&old, RecursiveMode::Recursive).unwrap();

        assert!(!follow_content_dir(&mut watcher, &mut watched, &old).unwrap());
        assert!(follow_content_dir(&mut watcher, &mut watched, &dir.path().join("missing")).is_err());
        assert_eq!(watched, old);
        assert_eq!(watcher.watched, vec![old]);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "timezone: Nowhere/Special\n").unwrap();

        let mut watcher = RecordingWatcher::default();
        let mut watched = dir.path().join("content");
        assert!(on_change(&mut watcher, &mut watched, dir.path(), false).is_err());
        assert_eq!(watched, dir.path().join("content"));
    }
}
