mod common;

use assert2::{check, let_assert};
use common::{DocsSite, docs_site};
use docs_search::{IndexEntry, KeywordResolver, ResolveStrategy};
use rstest::rstest;

async fn documents(site: &DocsSite) -> Vec<IndexEntry> {
    let cache = site.engine.current_cache().await.unwrap();
    cache.index.values().cloned().collect()
}

/// Test: An ambiguous keyword is settled by the page it appears on.
#[rstest]
#[tokio::test]
async fn context_picks_between_candidates(docs_site: DocsSite) {
    let docs = documents(&docs_site).await;
    let mut resolver = KeywordResolver::new(ResolveStrategy::Strict);

    let api_page = "# Programmatic access\nCall the api from a script.";
    let resolved = resolver.resolve("cache", &docs, Some(api_page));
    let_assert!(Some(best) = &resolved.best);
    check!(best.id == "api/cache");
    check!(resolved.is_ambiguous);
    check!(resolved.alternatives.len() == 1);
    check!(resolved.related_keywords == vec!["api".to_string(), "ttl".to_string()]);
}

/// Test: Related keywords follow what the current page talks about.
#[rstest]
#[tokio::test]
async fn context_orders_related_keywords(docs_site: DocsSite) {
    let docs = documents(&docs_site).await;
    let mut resolver = KeywordResolver::new(ResolveStrategy::Strict);

    let guide_page = "# Caching guide\n## TTL\nThe search cache expires after the TTL.";
    let resolved = resolver.resolve("cache", &docs, Some(guide_page));
    check!(resolved.is_ambiguous, "Resolved: {}", resolved);
    check!(resolved.related_keywords.first().map(String::as_str) == Some("ttl"));
}

/// Test: Without a context no related keywords are produced.
#[rstest]
#[tokio::test]
async fn no_context_no_related_keywords(docs_site: DocsSite) {
    let docs = documents(&docs_site).await;
    let mut resolver = KeywordResolver::default();

    let resolved = resolver.resolve("Caching", &docs, None);
    let_assert!(Some(best) = &resolved.best);
    check!(best.id == "guides/caching");
    check!(resolved.related_keywords.is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_keyword_reports_not_found(docs_site: DocsSite) {
    let docs = documents(&docs_site).await;
    let mut resolver = KeywordResolver::default();

    let resolved = resolver.resolve("kubernetes", &docs, Some("# Ops"));
    check!(resolved.best.is_none());
    check!(resolved.to_string().contains("kubernetes"));
}
