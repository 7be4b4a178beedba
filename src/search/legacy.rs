//! Legacy token-based search engine, kept as a fallback.
//!
//! Each field has its own inverted index. A query is run against title,
//! description and content in that order and the hits are merged keeping the
//! first occurrence of each document. Scores decay with merged rank
//! (`1 / (rank + 1)`) and are not comparable with the primary engine's
//! field-priority scores, so the two result sets are never mixed.

use super::index::InvertedIndex;
use super::scanner::scan_content;
use super::scoring::{ScoredField, create_excerpt};
use super::tokenize::TermBuilder;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{IndexEntry, SearchOptions, SearchResult};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Per-field inverted indexes over a fixed list of entries.
#[derive(Debug)]
pub struct LegacyIndex {
    entries: Vec<IndexEntry>,
    /// Indexed in [`ScoredField::ALL`] order.
    fields: [InvertedIndex; 3],
}

impl LegacyIndex {
    pub fn build(mut entries: Vec<IndexEntry>) -> Self {
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        let fields = ScoredField::ALL.map(|field| {
            let mut builder = TermBuilder::new(entries.len());
            for (doc, entry) in entries.iter().enumerate() {
                builder.add_terms(field.text(entry), doc, 1.0);
            }
            builder.finalize()
        });

        tracing::info!(
            "Built legacy search index: {} documents, {} title terms, {} content terms",
            entries.len(),
            fields[0].term_count(),
            fields[2].term_count()
        );

        Self { entries, fields }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs `query` against each field; excerpts span `context_length`
    /// characters either side of the match.
    pub fn search(&self, query: &str, limit: usize, context_length: usize) -> Vec<SearchResult> {
        let mut seen = HashSet::new();
        let mut merged = Vec::new();

        for (field, index) in ScoredField::ALL.iter().zip(&self.fields) {
            let hits = index.search(query, limit);
            tracing::debug!("Legacy {:?} search returned {} hits", field, hits.len());
            for (doc, _) in hits {
                if seen.insert(doc) {
                    merged.push(doc);
                }
            }
        }

        merged
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(rank, doc)| {
                let entry = self.entries[doc].clone();
                let excerpt = create_excerpt(&entry.content, query, context_length);
                SearchResult {
                    score: 1.0 / (rank + 1) as f64,
                    matched_content: (!excerpt.is_empty()).then_some(excerpt),
                    entry,
                }
            })
            .collect()
    }
}

/// Fallback engine over its own lazily built [`LegacyIndex`].
///
/// The index is built from a fresh scan on first use and then kept for the
/// engine's lifetime.
#[derive(Debug)]
pub struct LegacySearchEngine {
    config: Arc<SearchConfig>,
    index: OnceCell<Arc<LegacyIndex>>,
}

impl LegacySearchEngine {
    pub fn new(config: Arc<SearchConfig>) -> Self {
        Self {
            config,
            index: OnceCell::new(),
        }
    }

    /// Engine over a prebuilt entry list; never touches the file system.
    pub fn from_entries(config: Arc<SearchConfig>, entries: Vec<IndexEntry>) -> Self {
        Self {
            config,
            index: OnceCell::new_with(Some(Arc::new(LegacyIndex::build(entries)))),
        }
    }

    async fn index(&self) -> Result<&Arc<LegacyIndex>, SearchError> {
        self.index
            .get_or_try_init(|| async {
                let cache = scan_content(&self.config).await?;
                Ok(Arc::new(LegacyIndex::build(
                    cache.index.into_values().collect(),
                )))
            })
            .await
    }

    pub async fn try_search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.chars().count() < self.config.search.min_query_length.max(1) {
            return Ok(Vec::new());
        }
        let limit = options.limit.unwrap_or(self.config.search.max_results);
        let index = self.index().await?;
        Ok(index.search(query, limit, self.config.search.context_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;
    use assert2::check;

    fn entry(id: &str, title: &str, content: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            content: content.to_string(),
            path: format!("/{}", id),
            category: String::new(),
            keywords: Vec::new(),
            source_type: SourceType::Content,
        }
    }

    #[test]
    fn test_merge_keeps_first_seen_and_decays() {
        let index = LegacyIndex::build(vec![
            entry("a", "Deployment", "deployment steps"),
            entry("b", "Other", "notes about deployment"),
            entry("c", "Unrelated", "nothing"),
        ]);

        let results = index.search("deployment", 10, 50);
        check!(results.len() == 2);
        // Title hits come first, content-only hits after.
        check!(results[0].id() == "a");
        check!(results[1].id() == "b");
        check!(results[0].score == 1.0);
        check!(results[1].score == 0.5);
    }

    #[tokio::test]
    async fn test_excerpt_uses_configured_context_length() {
        let mut config = SearchConfig::default();
        config.search.context_length = 4;
        let engine = LegacySearchEngine::from_entries(
            Arc::new(config),
            vec![entry("a", "Guide", "first install the toolchain then build")],
        );

        let results = engine.try_search("toolchain", SearchOptions::default()).await.unwrap();
        check!(results.len() == 1);
        check!(results[0].matched_content.as_deref() == Some("...the toolchain the..."));
    }

    #[tokio::test]
    async fn test_prebuilt_engine_respects_min_length() {
        let config = Arc::new(SearchConfig::default());
        let engine = LegacySearchEngine::from_entries(config, vec![entry("a", "Go", "go")]);
        check!(engine.try_search("g", SearchOptions::default()).await.unwrap().is_empty());
        check!(engine.try_search("  ", SearchOptions::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Arc::new(SearchConfig::default().with_content_root(temp.path().join("gone")));
        let engine = LegacySearchEngine::new(config);
        check!(engine.try_search("anything", SearchOptions::default()).await.is_err());
    }
}
