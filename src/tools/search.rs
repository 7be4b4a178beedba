//! Top-level search entry points.
//!
//! These never fail: an engine error is logged and the caller sees fewer
//! (or no) results. Primary and fallback results are never mixed, since the
//! two engines score on different scales.

use crate::search::SearchBackend;
use crate::types::{SearchOptions, SearchResult};
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Maximum number of results to return (default: configured maximum)
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Searches with `primary`, falling back to `fallback` only if `primary` fails.
pub async fn search_documents(
    primary: &impl SearchBackend,
    fallback: &impl SearchBackend,
    request: &SearchRequest,
) -> Vec<SearchResult> {
    let options = SearchOptions {
        limit: request.limit,
        ..SearchOptions::default()
    };

    match primary.try_search(&request.query, options).await {
        Ok(results) => return results,
        Err(e) => tracing::error!(
            "{} search failed for {:?}, trying {}: {}",
            primary.name(),
            request.query,
            fallback.name(),
            e
        ),
    }

    match fallback.try_search(&request.query, options).await {
        Ok(results) => {
            tracing::info!(
                "{} search returned {} results for {:?}",
                fallback.name(),
                results.len(),
                request.query
            );
            results
        }
        Err(e) => {
            tracing::error!(
                "{} search also failed for {:?}: {}",
                fallback.name(),
                request.query,
                e
            );
            Vec::new()
        }
    }
}

/// Type-ahead suggestions: a small, fast-mode primary search with no fallback.
pub async fn get_suggestions(
    primary: &impl SearchBackend,
    query: &str,
    limit: usize,
) -> Vec<SearchResult> {
    match primary.try_search(query, SearchOptions::fast(limit)).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Suggestions failed for {:?}: {}", query, e);
            Vec::new()
        }
    }
}

/// Renders results as plain text, one block per hit.
pub fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'.", query);
    }

    let mut output = format!("Results for '{}' ({}):\n", query, results.len());
    for (i, result) in results.iter().enumerate() {
        let entry = &result.entry;
        let _ = writeln!(
            output,
            "\n{}. {} [{}] (score: {:.2})",
            i + 1,
            entry.title,
            entry.path,
            result.score
        );
        if !entry.description.is_empty() {
            let _ = writeln!(output, "   {}", entry.description);
        }
        if let Some(excerpt) = &result.matched_content {
            let _ = writeln!(output, "   > {}", excerpt.replace('\n', " "));
        }
    }
    output
}
