//! Search configuration.
//!
//! The configuration is read once at startup and shared read-only as
//! `Arc<SearchConfig>`. Every field has a default so an empty TOML file is valid.

use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at a TOML configuration file.
pub const CONFIG_ENV_VAR: &str = "DOCS_SEARCH_CONFIG";

/// Top-level configuration for the search subsystem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Root directory of the content tree.
    pub content_root: PathBuf,
    /// File extensions (without the dot) treated as structured text.
    pub extensions: Vec<String>,
    pub search: QuerySettings,
    pub scoring: FieldScores,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    /// Queries shorter than this (in characters, after trimming) return nothing.
    pub min_query_length: usize,
    /// Default result limit.
    pub max_results: usize,
    /// Default limit for type-ahead suggestions.
    pub suggestion_limit: usize,
    /// Characters kept on each side of a match when building an excerpt.
    pub context_length: usize,
}

/// Base score awarded for a match in each scored field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldScores {
    pub title: f64,
    pub description: f64,
    pub content: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    /// Maximum age of the cache before it is rebuilt regardless of file changes.
    pub ttl_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("contents"),
            extensions: vec!["md".to_string(), "mdx".to_string()],
            search: QuerySettings::default(),
            scoring: FieldScores::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            min_query_length: 2,
            max_results: 20,
            suggestion_limit: 5,
            context_length: 50,
        }
    }
}

impl Default for FieldScores {
    fn default() -> Self {
        Self {
            title: 100.0,
            description: 70.0,
            content: 40.0,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

impl CacheSettings {
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl SearchConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse search configuration")
    }

    /// Loads a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads the file named by [`CONFIG_ENV_VAR`], or returns the defaults.
    pub fn from_env_or_default() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Returns a copy rooted at `root`.
    pub fn with_content_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.content_root = root.into();
        self
    }

    /// Whether `ext` (without the dot) is one of the structured-text extensions.
    pub fn is_content_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }
}
