//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Every test builds its own content tree in a temporary directory and its
//! own [`SearchEngine`], so no cache state is shared between tests.
//!
//! # Available Fixtures
//!
//! - `docs_site`: a small documentation tree under `docs/` with an engine
//!   rooted there (recommended)
//!
//! # Shared Infrastructure
//!
//! [`TempWorkspace`] provides a reusable temp directory abstraction for any test
//! that needs filesystem isolation.

use docs_search::{SearchConfig, SearchEngine};
use rstest::fixture;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A temporary workspace directory for test isolation.
///
/// # Example
///
/// ```ignore
/// let workspace = TempWorkspace::new();
/// workspace.create_file("docs/intro.md", "---\ntitle: Intro\n---\nBody");
/// assert!(workspace.path().join("docs/intro.md").exists());
/// ```
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a directory (and all parent directories) within this workspace.
    ///
    /// # Panics
    /// Panics if directory creation fails.
    pub fn create_dir(&self, path: &str) {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .unwrap_or_else(|e| panic!("Failed to create directory '{}': {}", path, e));
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }

    /// Removes a file within this workspace.
    pub fn remove_file(&self, path: &str) {
        std::fs::remove_file(self.root.join(path))
            .unwrap_or_else(|e| panic!("Failed to remove file '{}': {}", path, e));
    }

    /// Rewrites a file and pushes its modification time an hour into the
    /// future, so the change is visible regardless of timestamp granularity.
    pub fn modify_file(&self, path: &str, content: &str) {
        self.create_file(path, content);
        let later = SystemTime::now() + Duration::from_secs(3600);
        File::options()
            .write(true)
            .open(self.root.join(path))
            .and_then(|f| f.set_modified(later))
            .unwrap_or_else(|e| panic!("Failed to touch '{}': {}", path, e));
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A documentation tree with an engine rooted at its `docs/` directory.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct DocsSite {
    pub workspace: TempWorkspace,
    pub config: Arc<SearchConfig>,
    pub engine: SearchEngine,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl DocsSite {
    /// Creates the site with the default page set and a long TTL.
    pub fn new() -> Self {
        Self::with_ttl(3600)
    }

    pub fn with_ttl(ttl_secs: u64) -> Self {
        let workspace = TempWorkspace::new();
        workspace.create_file(
            "docs/intro.md",
            "---\ntitle: \"Getting Started\"\ndescription: \"Intro guide\"\n---\nWelcome to the platform. This guide covers setup.",
        );
        workspace.create_file(
            "docs/guides/caching.mdx",
            "---\ntitle: Caching\ndescription: How the search cache is rebuilt\ncategory: guides\nkeywords: [cache, ttl]\n---\n# Caching\n\nThe cache is rebuilt when files change or the TTL expires.",
        );
        workspace.create_file(
            "docs/api/cache.md",
            "+++\ntitle = \"Cache API\"\ndescription = \"Programmatic cache access\"\nkeywords = [\"cache\", \"api\"]\n+++\nCall `rebuild` to refresh the index.",
        );
        workspace.create_file("docs/notes.txt", "setup notes that are never indexed");

        let mut config = SearchConfig::default().with_content_root(workspace.path().join("docs"));
        config.cache.ttl_secs = ttl_secs;
        let config = Arc::new(config);
        let engine = SearchEngine::new(Arc::clone(&config));

        Self {
            workspace,
            config,
            engine,
        }
    }

    /// Path of a page relative to the content root.
    pub fn page(&self, relative: &str) -> String {
        format!("docs/{}", relative)
    }
}

impl Default for DocsSite {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture: a fresh documentation site per test.
#[fixture]
pub fn docs_site() -> DocsSite {
    DocsSite::new()
}
