//! TF-IDF inverted index used by the legacy search engine.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;

use super::tokenize::{DocIdx, TermHash, hash_term, tokenize_and_stem};

/// A searchable term index with TF-IDF scoring over one text field.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    /// Map from term hash to list of (document, tf_idf_score) pairs, sorted by score descending
    terms: HashMap<TermHash, Vec<(DocIdx, f32)>>,
    document_count: usize,
}

impl InvertedIndex {
    pub(super) fn new(terms: HashMap<TermHash, Vec<(DocIdx, f32)>>, document_count: usize) -> Self {
        Self {
            terms,
            document_count,
        }
    }

    /// Searches for documents containing every query token.
    /// Returns document positions sorted by combined TF-IDF score (highest first).
    ///
    /// The query is tokenized and stemmed just like indexed terms, so
    /// "Guides" matches documents containing "guide" or "guiding".
    pub fn search(&self, query: &str, limit: usize) -> Vec<(DocIdx, f32)> {
        let stemmer = Stemmer::create(Algorithm::English);
        let mut tokens = tokenize_and_stem(query, &stemmer);
        tokens.sort();
        tokens.dedup();

        if tokens.is_empty() {
            return vec![];
        }

        let mut combined_scores: HashMap<DocIdx, (f32, usize)> = HashMap::new();
        for token in &tokens {
            if let Some(postings) = self.terms.get(&hash_term(token)) {
                for (doc, score) in postings {
                    let slot = combined_scores.entry(*doc).or_insert((0.0, 0));
                    slot.0 += score;
                    slot.1 += 1;
                }
            }
        }

        let mut results: Vec<_> = combined_scores
            .into_iter()
            .filter(|(_, (_, hits))| *hits == tokens.len())
            .map(|(doc, (score, _))| (doc, score))
            .collect();
        results.sort_by(|(a_doc, a), (b_doc, b)| b.total_cmp(a).then(a_doc.cmp(b_doc)));
        results.truncate(limit);
        results
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.document_count
    }
}

#[cfg(test)]
mod tests {
    use super::super::tokenize::TermBuilder;
    use assert2::check;

    #[test]
    fn test_all_tokens_required() {
        let mut builder = TermBuilder::new(3);
        builder.add_terms("installation guide", 0, 1.0);
        builder.add_terms("installation", 1, 1.0);
        builder.add_terms("unrelated page", 2, 1.0);
        let index = builder.finalize();

        let results = index.search("installation guide", 10);
        check!(results.len() == 1);
        check!(results[0].0 == 0);

        let both = index.search("installation", 10);
        check!(both.len() == 2);
    }

    #[test]
    fn test_repeated_term_ranks_higher() {
        let mut builder = TermBuilder::new(2);
        builder.add_terms("deploy deploy deploy pipeline", 0, 1.0);
        builder.add_terms("deploy once among many other words here", 1, 1.0);
        let index = builder.finalize();

        let results = index.search("deploy", 10);
        check!(results.len() == 2);
        check!(results[0].0 == 0);
        check!(results[0].1 > results[1].1);
    }

    #[test]
    fn test_counts() {
        let mut builder = TermBuilder::new(2);
        builder.add_terms("alpha beta", 0, 1.0);
        let index = builder.finalize();
        check!(index.document_count() == 2);
        check!(index.term_count() == 2);
        check!(index.search("", 5).is_empty());
        check!(index.search("gamma", 5).is_empty());
    }
}
