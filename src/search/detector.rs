//! Change detection: decides whether a cache snapshot is stale relative to disk.
//!
//! The walk short-circuits on the first difference, so an unchanged tree costs
//! one `stat` per entry and a changed tree usually much less.

use super::cache::FileStats;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Returns `true` if anything under `root` was added, removed or modified since
/// `file_stats` was recorded.
///
/// Errors are treated as changes so a rebuild is preferred over stale results.
pub(crate) async fn has_changes(root: &Path, file_stats: &FileStats) -> bool {
    let mut detector = Detector::new(file_stats);
    detector.check_dir(root.to_path_buf()).await
}

struct Detector<'a> {
    stats: &'a FileStats,
    /// Recorded paths grouped by parent directory, for deletion checks.
    children: HashMap<&'a Path, Vec<&'a Path>>,
    visited: HashSet<PathBuf>,
}

impl<'a> Detector<'a> {
    fn new(stats: &'a FileStats) -> Self {
        let mut children: HashMap<&Path, Vec<&Path>> = HashMap::new();
        for path in stats.keys() {
            if let Some(parent) = path.parent() {
                children.entry(parent).or_default().push(path);
            }
        }
        Self {
            stats,
            children,
            visited: HashSet::new(),
        }
    }

    fn check_dir(&mut self, dir: PathBuf) -> BoxFuture<'_, bool> {
        async move {
            let key = tokio::fs::canonicalize(&dir)
                .await
                .unwrap_or_else(|_| dir.clone());
            if !self.visited.insert(key) {
                tracing::warn!(
                    "Circular reference detected or already checked: {}",
                    dir.display()
                );
                return false;
            }

            let metadata = match tokio::fs::metadata(&dir).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    let was_recorded = self.stats.contains_key(&dir);
                    if was_recorded {
                        tracing::debug!("Directory deleted: {}", dir.display());
                    }
                    return was_recorded;
                }
                Err(e) => {
                    tracing::warn!("Error stating directory {}: {}", dir.display(), e);
                    return true;
                }
            };

            match metadata.modified() {
                Ok(mtime) if self.is_newer(&dir, mtime) => {
                    tracing::debug!("Directory mtime changed: {}", dir.display());
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("No modification time for {}: {}", dir.display(), e);
                    return true;
                }
            }

            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Error reading directory {}: {}", dir.display(), e);
                    return true;
                }
            };

            let mut present = HashSet::new();
            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Error listing {}: {}", dir.display(), e);
                        return true;
                    }
                };
                let path = entry.path();

                let (mtime, is_dir) = match tokio::fs::metadata(&path)
                    .await
                    .and_then(|m| Ok((m.modified()?, m.is_dir())))
                {
                    Ok(stat) => stat,
                    Err(e) => {
                        tracing::warn!("Error stating file/directory {}: {}", path.display(), e);
                        return true;
                    }
                };

                if !self.stats.contains_key(&path) {
                    tracing::debug!("New file/directory detected: {}", path.display());
                    return true;
                }
                if self.is_newer(&path, mtime) {
                    tracing::debug!("File/directory mtime changed: {}", path.display());
                    return true;
                }

                if is_dir && self.check_dir(path.clone()).await {
                    return true;
                }
                present.insert(path);
            }

            if let Some(recorded) = self.children.get(dir.as_path())
                && let Some(deleted) = recorded.iter().find(|p| !present.contains(**p))
            {
                tracing::debug!("File/directory deleted: {}", deleted.display());
                return true;
            }

            false
        }
        .boxed()
    }

    /// Unrecorded paths count as newer.
    fn is_newer(&self, path: &Path, mtime: std::time::SystemTime) -> bool {
        self.stats.get(path).is_none_or(|cached| mtime > *cached)
    }
}
