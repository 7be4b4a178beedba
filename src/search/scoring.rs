//! Field-priority scoring and excerpt generation.
//!
//! An entry's score is the **maximum** base score among the fields that
//! contain the query, not the sum: a document matching in both title and
//! content scores the same as a title-only match.

use super::cache::SearchCache;
use crate::config::{FieldScores, SearchConfig};
use crate::types::{IndexEntry, SearchResult};

const ELLIPSIS: &str = "...";

/// Fields considered by the scorer, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoredField {
    Title,
    Description,
    Content,
}

impl ScoredField {
    pub const ALL: [Self; 3] = [Self::Title, Self::Description, Self::Content];

    pub fn text(self, entry: &IndexEntry) -> &str {
        match self {
            Self::Title => &entry.title,
            Self::Description => &entry.description,
            Self::Content => &entry.content,
        }
    }

    pub const fn base_score(self, scores: &FieldScores) -> f64 {
        match self {
            Self::Title => scores.title,
            Self::Description => scores.description,
            Self::Content => scores.content,
        }
    }
}

/// Scores every entry in `cache` against `query`, sorted by score and truncated to `limit`.
pub(crate) fn search_in_cache(
    cache: &SearchCache,
    query: &str,
    limit: usize,
    config: &SearchConfig,
) -> Vec<SearchResult> {
    let needle = fold_case(query);
    if needle.is_empty() {
        return Vec::new();
    }

    tracing::debug!(
        "Searching in cache for query: {:?} with limit {}",
        query,
        limit
    );

    let mut results: Vec<SearchResult> = cache
        .index
        .values()
        .filter_map(|entry| score_entry(entry, query, &needle, config))
        .collect();

    tracing::debug!(
        "Found {} potential matches in cache before sorting and limiting",
        results.len()
    );

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(limit);
    results
}

/// Scores one entry; `needle` is the case-folded query.
fn score_entry(
    entry: &IndexEntry,
    query: &str,
    needle: &str,
    config: &SearchConfig,
) -> Option<SearchResult> {
    let mut score: Option<f64> = None;
    let mut matched_content = None;

    for field in ScoredField::ALL {
        if !fold_case(field.text(entry)).contains(needle) {
            continue;
        }
        tracing::debug!("Match found in {:?} for ID {}", field, entry.id);

        let base = field.base_score(&config.scoring);
        score = Some(score.map_or(base, |s| s.max(base)));

        if field == ScoredField::Content {
            matched_content = Some(create_excerpt(
                &entry.content,
                query,
                config.search.context_length,
            ));
        }
    }

    score.map(|score| SearchResult {
        entry: entry.clone(),
        score,
        matched_content,
    })
}

/// Returns a window of `context_length` characters either side of the first
/// case-insensitive occurrence of `query` in `content`.
///
/// Ellipses mark truncation at either end. Returns an empty string when the
/// query does not occur.
pub fn create_excerpt(content: &str, query: &str, context_length: usize) -> String {
    let haystack = fold_case(content);
    let needle = fold_case(query);
    let Some(byte_idx) = haystack.find(&needle) else {
        return String::new();
    };

    // Folding maps char to char, so char offsets line up with `content`.
    let match_start = haystack[..byte_idx].chars().count();
    let match_len = needle.chars().count();
    let total = content.chars().count();

    let start = match_start.saturating_sub(context_length);
    let end = (match_start + match_len).saturating_add(context_length).min(total);

    let mut excerpt = String::new();
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.extend(content.chars().skip(start).take(end - start));
    if end < total {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}

/// Lower-cases `text` one char at a time.
///
/// Chars whose lowercase form is several chars are kept as-is so that char
/// positions in the folded text match the original.
pub(crate) fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}
