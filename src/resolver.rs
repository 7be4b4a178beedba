//! Keyword resolution: picks the document a keyword most likely refers to.
//!
//! Candidates are the entries whose title or keyword list matches the
//! keyword; they are then ranked by [`ContextAwareMatcher`] against the page
//! the keyword appears on.

use crate::context::ContextAwareMatcher;
use crate::types::IndexEntry;
use serde::Serialize;
use std::fmt;

/// Keywords this short (in characters) are always matched strictly.
const ADAPTIVE_STRICT_MAX_LEN: usize = 3;

/// How candidates are selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveStrategy {
    /// Title or a keyword equals the keyword (case-insensitive).
    Strict,
    /// Title or a keyword contains the keyword (case-insensitive).
    Fuzzy,
    /// Strict for short keywords or when there is no context, fuzzy otherwise.
    #[default]
    Adaptive,
}

impl ResolveStrategy {
    /// Resolves [`Adaptive`](Self::Adaptive) to a concrete strategy.
    fn effective(self, keyword: &str, context: Option<&str>) -> Self {
        match self {
            Self::Adaptive => {
                let has_context = context.is_some_and(|c| !c.trim().is_empty());
                if keyword.chars().count() <= ADAPTIVE_STRICT_MAX_LEN || !has_context {
                    Self::Strict
                } else {
                    Self::Fuzzy
                }
            }
            other => other,
        }
    }

    fn matches(self, keyword_lower: &str, entry: &IndexEntry) -> bool {
        let check = |text: &str| {
            let text = text.to_lowercase();
            match self {
                Self::Fuzzy => text.contains(keyword_lower),
                Self::Strict | Self::Adaptive => text == keyword_lower,
            }
        };
        check(&entry.title) || entry.keywords.iter().any(|k| check(k))
    }
}

/// Outcome of resolving one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedKeyword {
    pub keyword: String,
    /// Highest ranked candidate.
    pub best: Option<IndexEntry>,
    /// Remaining candidates, best first.
    pub alternatives: Vec<IndexEntry>,
    pub is_ambiguous: bool,
    pub related_keywords: Vec<String>,
    /// Why nothing was resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResolvedKeyword {
    fn not_found(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            best: None,
            alternatives: Vec::new(),
            is_ambiguous: false,
            related_keywords: Vec::new(),
            error: Some(format!("No document found for keyword \"{}\"", keyword)),
        }
    }
}

impl fmt::Display for ResolvedKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(best) = &self.best else {
            return write!(
                f,
                "{}",
                self.error.as_deref().unwrap_or("No document found")
            );
        };

        writeln!(f, "{} -> {} [{}]", self.keyword, best.title, best.path)?;
        if self.is_ambiguous {
            writeln!(f, "\nAlternatives:")?;
            for alt in &self.alternatives {
                writeln!(f, "  • {} [{}]", alt.title, alt.path)?;
            }
        }
        if !self.related_keywords.is_empty() {
            writeln!(f, "\nRelated: {}", self.related_keywords.join(", "))?;
        }
        Ok(())
    }
}

/// Resolves keywords against a document list.
#[derive(Debug, Clone)]
pub struct KeywordResolver {
    matcher: ContextAwareMatcher,
    strategy: ResolveStrategy,
    max_related_keywords: usize,
}

impl Default for KeywordResolver {
    fn default() -> Self {
        Self::new(ResolveStrategy::default())
    }
}

impl KeywordResolver {
    pub fn new(strategy: ResolveStrategy) -> Self {
        Self {
            matcher: ContextAwareMatcher::new(),
            strategy,
            max_related_keywords: 5,
        }
    }

    /// Caps how many related keywords [`resolve`](Self::resolve) reports.
    pub fn with_max_related_keywords(mut self, max: usize) -> Self {
        self.max_related_keywords = max;
        self
    }

    /// Resolves `keyword` among `documents`, ranking by `context` when given.
    pub fn resolve(
        &mut self,
        keyword: &str,
        documents: &[IndexEntry],
        context: Option<&str>,
    ) -> ResolvedKeyword {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return ResolvedKeyword::not_found(keyword);
        }

        let strategy = self.strategy.effective(keyword, context);
        let keyword_lower = keyword.to_lowercase();
        let mut candidates: Vec<IndexEntry> = documents
            .iter()
            .filter(|entry| strategy.matches(&keyword_lower, entry))
            .cloned()
            .collect();
        // Documents usually come from a hash map; fix the order before the stable sort.
        candidates.sort_by(|a, b| a.id.cmp(&b.id));

        tracing::debug!(
            "Resolving {:?} with {:?}: {} candidates",
            keyword,
            strategy,
            candidates.len()
        );
        if candidates.is_empty() {
            return ResolvedKeyword::not_found(keyword);
        }

        self.matcher.set_context(context.unwrap_or_default());
        let ranked = self.matcher.sort_by_context_relevance(keyword, candidates);

        let related_keywords = if context.is_some() {
            self.matcher
                .extract_related_keywords(keyword, &ranked, self.max_related_keywords)
        } else {
            Vec::new()
        };

        let mut ranked = ranked.into_iter();
        let best = ranked.next();
        let alternatives: Vec<_> = ranked.collect();

        ResolvedKeyword {
            keyword: keyword.to_string(),
            best,
            is_ambiguous: !alternatives.is_empty(),
            alternatives,
            related_keywords,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceType;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn entry(id: &str, title: &str, description: &str, keywords: &[&str]) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            content: String::new(),
            path: format!("/{}", id),
            category: String::new(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            source_type: SourceType::Content,
        }
    }

    fn corpus() -> Vec<IndexEntry> {
        vec![
            entry("guides/cache", "Caching", "How the cache is rebuilt", &["cache", "ttl"]),
            entry("api/cache", "Cache API", "Programmatic cache access", &["cache", "api"]),
            entry("guides/routing", "Routing", "Route matching", &["router"]),
        ]
    }

    #[rstest]
    #[case(ResolveStrategy::Adaptive, "abc", Some("long context"), ResolveStrategy::Strict)]
    #[case(ResolveStrategy::Adaptive, "caching", None, ResolveStrategy::Strict)]
    #[case(ResolveStrategy::Adaptive, "caching", Some("   "), ResolveStrategy::Strict)]
    #[case(ResolveStrategy::Adaptive, "caching", Some("# Page"), ResolveStrategy::Fuzzy)]
    #[case(ResolveStrategy::Fuzzy, "ab", None, ResolveStrategy::Fuzzy)]
    #[case(ResolveStrategy::Strict, "caching", Some("# Page"), ResolveStrategy::Strict)]
    fn test_effective_strategy(
        #[case] strategy: ResolveStrategy,
        #[case] keyword: &str,
        #[case] context: Option<&str>,
        #[case] expected: ResolveStrategy,
    ) {
        check!(strategy.effective(keyword, context) == expected);
    }

    #[test]
    fn test_unknown_keyword_is_not_found() {
        let mut resolver = KeywordResolver::new(ResolveStrategy::Strict);
        let resolved = resolver.resolve("deployment", &corpus(), None);
        check!(resolved.best.is_none());
        check!(!resolved.is_ambiguous);
        let_assert!(Some(message) = resolved.error);
        check!(message.contains("deployment"));
    }

    #[test]
    fn test_strict_match_on_keyword_list() {
        let mut resolver = KeywordResolver::new(ResolveStrategy::Strict);
        let resolved = resolver.resolve("Router", &corpus(), None);
        let_assert!(Some(best) = resolved.best);
        check!(best.id == "guides/routing");
        check!(!resolved.is_ambiguous);
        check!(resolved.related_keywords.is_empty());
    }

    #[test]
    fn test_ambiguous_keyword_ranked_by_context() {
        let mut resolver = KeywordResolver::new(ResolveStrategy::Strict);
        let context = "# Programmatic access\nCall the api from your code.";
        let resolved = resolver.resolve("cache", &corpus(), Some(context));

        check!(resolved.is_ambiguous);
        let_assert!(Some(best) = &resolved.best);
        check!(best.id == "api/cache");
        check!(resolved.alternatives.len() == 1);
        check!(resolved.alternatives[0].id == "guides/cache");
        check!(resolved.related_keywords.contains(&"api".to_string()));
        check!(!resolved.related_keywords.contains(&"cache".to_string()));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(5, 2)]
    fn test_max_related_keywords(#[case] max: usize, #[case] expected: usize) {
        let mut resolver =
            KeywordResolver::new(ResolveStrategy::Strict).with_max_related_keywords(max);
        let context = "# Programmatic access\nCall the api from your code.";
        let resolved = resolver.resolve("cache", &corpus(), Some(context));
        check!(resolved.related_keywords.len() == expected);
    }

    #[test]
    fn test_fuzzy_matches_substrings() {
        let mut resolver = KeywordResolver::new(ResolveStrategy::Fuzzy);
        let resolved = resolver.resolve("rout", &corpus(), None);
        let_assert!(Some(best) = resolved.best);
        check!(best.id == "guides/routing");
    }

    #[test]
    fn test_blank_keyword() {
        let mut resolver = KeywordResolver::default();
        check!(resolver.resolve("  ", &corpus(), None).error.is_some());
    }
}
