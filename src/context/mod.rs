//! Context-aware relevance matching.
//!
//! [`ContextAwareMatcher`] re-ranks a caller-supplied list of documents by
//! how well they fit the page currently being read. The page text is split
//! into headings, code blocks, list items and paragraphs, and every token
//! accumulates the weight of the section it appears in. Documents whose title
//! and description share heavily weighted tokens rank higher.

pub mod sections;
pub mod tokenize;

use crate::types::IndexEntry;
use sections::{SectionKind, extract_sections};
use std::collections::HashMap;
use tokenize::tokenize;

const TITLE_EXACT_BONUS: f64 = 10.0;
const TITLE_CONTAINS_BONUS: f64 = 5.0;
const KEYWORD_EXACT_BONUS: f64 = 8.0;
const KEYWORD_PARTIAL_BONUS: f64 = 4.0;
const DESCRIPTION_BONUS: f64 = 3.0;
const CONTEXT_OVERLAP_FACTOR: f64 = 0.2;
const MULTI_TOKEN_BONUS: f64 = 5.0;
const SIMILARITY_SHARE: f64 = 0.7;
const CONTEXT_SHARE: f64 = 0.3;

/// Metadata the matcher needs from a candidate document.
pub trait ContextDocument {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn keywords(&self) -> &[String];
}

impl ContextDocument for IndexEntry {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// A standalone candidate, for callers whose documents are not index entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

impl ContextDocument for DocumentMetadata {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

/// Ranks documents by similarity to a context document.
#[derive(Debug, Clone, Default)]
pub struct ContextAwareMatcher {
    document_content: String,
    context_keywords: HashMap<String, f64>,
    important_sections: HashMap<SectionKind, f64>,
    /// Corpus size for the IDF-like factor; zero until first set.
    document_count: usize,
}

impl ContextAwareMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the context and re-derives the weighted context keywords.
    pub fn set_context(&mut self, content: &str) {
        self.document_content = content.to_string();
        self.context_keywords.clear();
        self.important_sections.clear();

        for (kind, text) in extract_sections(content) {
            let weight = kind.weight();
            self.important_sections.insert(kind, weight);
            let tokens = tokenize(&text);
            tracing::trace!("{} section: {} tokens at weight {}", kind.name(), tokens.len(), weight);
            for token in tokens {
                *self.context_keywords.entry(token).or_insert(0.0) += weight;
            }
        }

        tracing::debug!(
            "Context set: {} chars, {} weighted keywords",
            content.len(),
            self.context_keywords.len()
        );
    }

    pub fn has_context(&self) -> bool {
        !self.document_content.is_empty()
    }

    /// Records the corpus size, floored at one.
    pub fn set_document_count(&mut self, count: usize) {
        self.document_count = count.max(1);
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Accumulated weight of `token` in the current context.
    pub fn context_weight(&self, token: &str) -> f64 {
        self.context_keywords.get(token).copied().unwrap_or(0.0)
    }

    /// Weight assigned to each section kind by the last [`set_context`](Self::set_context).
    pub fn section_weight(&self, kind: SectionKind) -> Option<f64> {
        self.important_sections.get(&kind).copied()
    }

    /// Relevance of `document` to `keyword` under the current context.
    pub fn calculate_relevance<D: ContextDocument>(&self, keyword: &str, document: &D) -> f64 {
        let keyword_lower = keyword.to_lowercase();
        let title = document.title().to_lowercase();
        let description = document.description().to_lowercase();
        let keywords: Vec<String> = document.keywords().iter().map(|k| k.to_lowercase()).collect();

        let mut score = 0.0;

        if title == keyword_lower {
            score += TITLE_EXACT_BONUS;
        } else if title.contains(&keyword_lower) {
            score += TITLE_CONTAINS_BONUS;
        }

        if keywords.iter().any(|k| *k == keyword_lower) {
            score += KEYWORD_EXACT_BONUS;
        } else if keywords
            .iter()
            .any(|k| k.contains(&keyword_lower) || keyword_lower.contains(k.as_str()))
        {
            score += KEYWORD_PARTIAL_BONUS;
        }

        if description.contains(&keyword_lower) {
            score += DESCRIPTION_BONUS;
        }

        score += self.context_overlap(document);

        let keyword_tokens = tokenize(keyword);
        if keyword_tokens.len() > 1 {
            let matched = keyword_tokens
                .iter()
                .filter(|token| {
                    title.contains(token.as_str())
                        || description.contains(token.as_str())
                        || keywords.iter().any(|k| k.contains(token.as_str()))
                })
                .count();
            score += matched as f64 / keyword_tokens.len() as f64 * MULTI_TOKEN_BONUS;
        }

        score
    }

    /// Term-overlap score between the document's title and description and the context.
    fn context_overlap<D: ContextDocument>(&self, document: &D) -> f64 {
        let words = tokenize(&format!("{} {}", document.title(), document.description()));
        let mut frequencies: Vec<(String, usize)> = Vec::new();
        for word in words {
            match frequencies.iter_mut().find(|(w, _)| *w == word) {
                Some((_, tf)) => *tf += 1,
                None => frequencies.push((word, 1)),
            }
        }

        frequencies
            .iter()
            .filter_map(|(word, tf)| {
                let context_frequency = self.context_weight(word);
                (context_frequency > 0.0).then(|| {
                    let idf = if self.document_count > 0 {
                        (self.document_count as f64 / (context_frequency + 1.0)).ln() + 1.0
                    } else {
                        1.0
                    };
                    *tf as f64 * idf * context_frequency * CONTEXT_OVERLAP_FACTOR
                })
            })
            .sum()
    }

    /// Sorts `documents` by relevance to `keyword`, highest first.
    ///
    /// The corpus size is taken from `documents`. Equal scores keep their
    /// input order.
    pub fn sort_by_context_relevance<D: ContextDocument>(
        &mut self,
        keyword: &str,
        documents: Vec<D>,
    ) -> Vec<D> {
        self.set_document_count(documents.len());

        let mut scored: Vec<(f64, D)> = documents
            .into_iter()
            .map(|doc| (self.calculate_relevance(keyword, &doc), doc))
            .collect();
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        scored.into_iter().map(|(_, doc)| doc).collect()
    }

    /// Keywords of `documents` most related to `keyword` under the current context.
    ///
    /// Returns nothing when no context has been set.
    pub fn extract_related_keywords<D: ContextDocument>(
        &self,
        keyword: &str,
        documents: &[D],
        max_keywords: usize,
    ) -> Vec<String> {
        if !self.has_context() {
            return Vec::new();
        }

        let base_tokens = tokenize(keyword);
        let keyword_lower = keyword.to_lowercase();
        let mut scores: Vec<(String, f64)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for candidate in documents.iter().flat_map(|doc| doc.keywords()) {
            if candidate.to_lowercase() == keyword_lower {
                continue;
            }

            let tokens = tokenize(candidate);
            let similarity = jaccard(&base_tokens, &tokens);
            let context_score: f64 = tokens.iter().map(|t| self.context_weight(t)).sum();
            let score = similarity * SIMILARITY_SHARE + context_score * CONTEXT_SHARE;

            match positions.get(candidate) {
                Some(&i) => scores[i].1 += score,
                None => {
                    positions.insert(candidate.clone(), scores.len());
                    scores.push((candidate.clone(), score));
                }
            }
        }

        scores.sort_by(|(_, a), (_, b)| b.total_cmp(a));
        scores
            .into_iter()
            .take(max_keywords)
            .map(|(keyword, _)| keyword)
            .collect()
    }
}

/// Size of the intersection over the size of the union of two token sets.
fn jaccard(a: &[String], b: &[String]) -> f64 {
    let intersection = a
        .iter()
        .filter(|x| b.contains(x))
        .collect::<std::collections::HashSet<_>>()
        .len();
    let union = a
        .iter()
        .chain(b)
        .collect::<std::collections::HashSet<_>>()
        .len();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
