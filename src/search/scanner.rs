//! Content scanner: turns a directory tree of documents into a [`SearchCache`].

use super::cache::SearchCache;
use super::frontmatter::{self, FrontMatterError};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{IndexEntry, SourceType};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

/// Scans the configured content root into a fresh cache.
///
/// Only a missing or unreadable root fails the scan; individual files and
/// directories that cannot be read are logged and skipped.
pub(crate) async fn scan_content(config: &SearchConfig) -> Result<SearchCache, SearchError> {
    let root = config.content_root.clone();

    let is_dir = tokio::fs::metadata(&root)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        let err = SearchError::IndexNotFound { path: root };
        tracing::error!("{}", err);
        return Err(err);
    }

    let start = Instant::now();
    let mut cache = SearchCache::new(SystemTime::now());
    let mut scanner = Scanner {
        root: &root,
        config,
        visited: HashSet::new(),
        cache: &mut cache,
    };
    scanner.scan_dir(root.clone()).await?;

    tracing::debug!(
        "Scanned {} in {:?}: {} entries, {} file stats",
        root.display(),
        start.elapsed(),
        cache.index.len(),
        cache.file_stats.len()
    );
    Ok(cache)
}

struct Scanner<'a> {
    root: &'a Path,
    config: &'a SearchConfig,
    /// Canonical paths of directories already entered during this scan.
    visited: HashSet<PathBuf>,
    cache: &'a mut SearchCache,
}

impl Scanner<'_> {
    fn scan_dir(&mut self, dir: PathBuf) -> BoxFuture<'_, Result<(), SearchError>> {
        async move {
            let key = canonical_key(&dir).await;
            if !self.visited.insert(key) {
                tracing::warn!(
                    "Skipping already scanned directory to prevent recursion: {}",
                    dir.display()
                );
                return Ok(());
            }

            match tokio::fs::metadata(&dir).await.and_then(|m| m.modified()) {
                Ok(mtime) => {
                    self.cache.file_stats.insert(dir.clone(), mtime);
                }
                Err(e) => {
                    tracing::warn!("Could not stat directory {}: {}", dir.display(), e);
                    return Ok(());
                }
            }

            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if dir == self.root => return Err(SearchError::io(dir, e)),
                Err(e) => {
                    tracing::warn!("Could not read directory {}: {}", dir.display(), e);
                    return Ok(());
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Error listing {}: {}", dir.display(), e);
                        break;
                    }
                };
                let path = entry.path();

                // Follows symlinks, so a linked directory is scanned like a real one.
                let metadata = match tokio::fs::metadata(&path).await {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        tracing::warn!("Could not access {} during scan: {}", path.display(), e);
                        continue;
                    }
                };
                match metadata.modified() {
                    Ok(mtime) => {
                        self.cache.file_stats.insert(path.clone(), mtime);
                    }
                    Err(e) => {
                        tracing::warn!("No modification time for {}: {}", path.display(), e);
                        continue;
                    }
                }

                if metadata.is_dir() {
                    self.scan_dir(path).await?;
                } else if metadata.is_file() && self.is_content_file(&path) {
                    self.index_file(&path).await;
                }
            }

            Ok(())
        }
        .boxed()
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.is_content_extension(ext))
    }

    async fn index_file(&mut self, path: &Path) {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read file {}: {}", path.display(), e);
                return;
            }
        };

        let Some(id) = document_id(self.root, path) else {
            tracing::warn!("{} is outside the content root", path.display());
            return;
        };

        match build_entry(id, path, &text) {
            Ok(entry) => {
                self.cache.index.insert(entry.id.clone(), entry);
            }
            Err(e) => {
                tracing::warn!("Failed to parse file {}: {}", path.display(), e);
            }
        }
    }
}

/// Canonical form of a directory path for the visited set.
async fn canonical_key(dir: &Path) -> PathBuf {
    tokio::fs::canonicalize(dir)
        .await
        .unwrap_or_else(|_| dir.to_path_buf())
}

/// Relative path from `root` with the extension stripped, `/`-separated.
pub(crate) fn document_id(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Builds an index entry from a document's text.
pub(crate) fn build_entry(
    id: String,
    path: &Path,
    text: &str,
) -> Result<IndexEntry, FrontMatterError> {
    let doc = frontmatter::parse(text)?;
    let meta = doc.front_matter;

    let title = meta.title.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.clone())
    });
    let site_path = meta.slug.unwrap_or_else(|| format!("/{}", id));

    Ok(IndexEntry {
        title,
        description: meta.description.unwrap_or_default(),
        content: doc.body.to_string(),
        path: site_path,
        category: meta.category.unwrap_or_default(),
        keywords: meta.keywords,
        source_type: SourceType::Content,
        id,
    })
}
