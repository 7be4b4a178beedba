//! Text tokenization and stemming utilities for the inverted index.

use ahash::{AHashMap, AHasher};
use rust_stemmers::{Algorithm, Stemmer};
use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
};

use super::index::InvertedIndex;

/// Minimum token length for indexing.
const MIN_TOKEN_LENGTH: usize = 2;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Position of a document in the index's document list.
pub(crate) type DocIdx = usize;

/// Term hash for fast lookup
pub(crate) type TermHash = u64;

/// Builder for accumulating term frequencies before TF-IDF finalization.
pub(crate) struct TermBuilder {
    /// Flat map from (term_hash, doc) → raw TF score
    term_docs: HashMap<(TermHash, DocIdx), f32>,
    /// Map from doc to document length (total term count for normalization)
    doc_lengths: HashMap<DocIdx, usize>,
    /// Number of documents the finished index covers, indexed or not
    doc_count: usize,
    /// Reusable stemmer instance for English language stemming
    stemmer: Stemmer,
}

impl TermBuilder {
    pub(crate) fn new(doc_count: usize) -> Self {
        Self {
            term_docs: HashMap::default(),
            doc_lengths: HashMap::default(),
            doc_count,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Add a term with its TF score for a specific document.
    fn add(&mut self, term: &str, tf_score: f32, doc: DocIdx) {
        let term_hash = hash_term(term);
        *self.term_docs.entry((term_hash, doc)).or_insert(0.0) += tf_score;
    }

    /// Extracts and adds terms from text with frequency counting.
    /// TF score = term_count * base_score.
    pub(crate) fn add_terms(&mut self, text: &str, doc: DocIdx, base_score: f32) {
        let words = tokenize_and_stem(text, &self.stemmer);

        let mut word_counts: AHashMap<String, usize> = AHashMap::with_capacity(words.len());
        for word in words {
            *word_counts.entry(word).or_insert(0) += 1;
        }

        let doc_len: usize = word_counts.values().sum();
        *self.doc_lengths.entry(doc).or_insert(0) += doc_len;

        for (word, count) in word_counts {
            let tf_score = (count as f32) * base_score;
            self.add(&word, tf_score, doc);
        }
    }

    /// Calculates IDF scores and produces the final searchable index.
    /// Uses formula: TF-IDF = (1 + ln(tf_normalized)) * ln(1 + total_docs / doc_freq),
    /// where tf_normalized = tf / doc_length for length normalization.
    pub(crate) fn finalize(self) -> InvertedIndex {
        let total_docs = self.doc_count.max(1) as f32;

        let total_length: usize = self.doc_lengths.values().sum();
        let avg_doc_length = if self.doc_lengths.is_empty() {
            1.0
        } else {
            total_length as f32 / self.doc_lengths.len() as f32
        };

        let mut grouped: HashMap<TermHash, Vec<(DocIdx, f32)>> = HashMap::new();
        for ((term_hash, doc), tf_score) in self.term_docs {
            grouped.entry(term_hash).or_default().push((doc, tf_score));
        }

        let mut terms: HashMap<TermHash, Vec<(DocIdx, f32)>> = HashMap::new();
        for (term_hash, doc_scores) in grouped {
            let doc_freq = doc_scores.len() as f32;
            let idf = (1.0 + total_docs / doc_freq).ln();

            let mut tf_idf_scores: Vec<_> = doc_scores
                .into_iter()
                .map(|(doc, tf_score)| {
                    let doc_length = self.doc_lengths.get(&doc).copied().unwrap_or(1) as f32;
                    let length_norm = doc_length / avg_doc_length;
                    let tf_normalized = tf_score / length_norm.max(0.5);
                    // Keep rare-but-present terms above zero.
                    (doc, (1.0 + tf_normalized.ln()).max(0.1) * idf)
                })
                .collect();

            tf_idf_scores.sort_by(|(a_doc, a), (b_doc, b)| b.total_cmp(a).then(a_doc.cmp(b_doc)));
            terms.insert(term_hash, tf_idf_scores);
        }

        InvertedIndex::new(terms, self.doc_count)
    }
}

/// Splits prose into stemmed index terms.
///
/// Words break on anything other than letters, digits, `-` and `_`. A
/// compound word such as "getting-started" or "max_results" is indexed by
/// each part and once as a whole, so both spellings of a query match.
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];

    let words = text
        .split(|c: char| !(c.is_alphanumeric() || is_joiner(c)))
        .map(|word| word.trim_matches(is_joiner))
        .filter(|word| !word.is_empty());

    for word in words {
        let parts: Vec<&str> = word.split(is_joiner).filter(|p| !p.is_empty()).collect();
        for part in &parts {
            if token_len(part) >= MIN_TOKEN_LENGTH {
                index_token(part, &mut tokens, stemmer);
            }
        }
        if parts.len() > 1 {
            index_token(word, &mut tokens, stemmer);
        }
    }

    tokens
}

fn is_joiner(c: char) -> bool {
    c == '-' || c == '_'
}

fn token_len(token: &str) -> usize {
    token.chars().count()
}

/// Add a token using proper stemming algorithm, filtering out stop words.
pub(crate) fn index_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    let lowercase = token.to_lowercase();

    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }

    let stemmed = stemmer.stem(&lowercase);
    tokens.push(stemmed.into_owned());
}

/// Hashes a term for fast lookup (case-insensitive).
pub(crate) fn hash_term(term: &str) -> TermHash {
    let mut hasher = AHasher::default();
    term.to_lowercase().hash(&mut hasher);
    hasher.finish()
}
