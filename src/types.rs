//! Records shared between the index, the engines and their callers.

use serde::Serialize;

/// Where an index entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Document-type metadata (an `index.json`-style listing).
    Index,
    /// A full content page. The only kind produced by the scanner.
    Content,
}

/// One searchable record derived from a single content document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    /// Path relative to the content root with the extension stripped.
    pub id: String,
    pub title: String,
    pub description: String,
    /// Body text with front-matter removed.
    pub content: String,
    /// Logical site path used for links.
    pub path: String,
    pub category: String,
    pub keywords: Vec<String>,
    pub source_type: SourceType,
}

/// An [`IndexEntry`] that matched a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub entry: IndexEntry,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_content: Option<String>,
}

impl SearchResult {
    pub fn id(&self) -> &str {
        &self.entry.id
    }
}

/// Hint describing how the caller intends to use the results.
///
/// The engine scores identically in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Hybrid,
    /// Type-ahead suggestions.
    Fast,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Maximum number of results; `None` uses the configured default.
    pub limit: Option<usize>,
    pub mode: SearchMode,
}

impl SearchOptions {
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            mode: SearchMode::Hybrid,
        }
    }

    pub const fn fast(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            mode: SearchMode::Fast,
        }
    }
}
