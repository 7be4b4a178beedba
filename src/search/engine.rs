//! Search engine: owns the published cache and decides when to rebuild it.
//!
//! Rebuilds run as spawned tasks behind a shared future, so concurrent
//! triggers wait on one scan and a rebuild still publishes its result when
//! every caller waiting on it has gone away. A new cache only becomes
//! visible once its scan has completed.

use super::cache::SearchCache;
use super::detector::has_changes;
use super::scanner::scan_content;
use super::scoring::search_in_cache;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchOptions, SearchResult};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Instant, SystemTime};
use tokio::sync::{Mutex, RwLock};

/// Type alias for the shared in-flight rebuild future.
type SharedRebuild = Shared<BoxFuture<'static, Result<Arc<SearchCache>, Arc<SearchError>>>>;

/// Seam between the top-level search tools and the engines behind them.
pub trait SearchBackend: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    fn try_search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;
}

/// The primary search engine.
///
/// Cheap to clone; clones share the same cache and in-flight rebuild.
#[derive(Clone)]
pub struct SearchEngine {
    inner: Arc<EngineState>,
}

struct EngineState {
    config: Arc<SearchConfig>,
    /// Last successfully built cache.
    cache: RwLock<Option<Arc<SearchCache>>>,
    /// Rebuild currently running, if any.
    in_flight: Mutex<Option<SharedRebuild>>,
    /// Scans started so far, successful or not.
    rebuilds: AtomicUsize,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("content_root", &self.inner.config.content_root)
            .field("rebuilds", &self.rebuild_count())
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    pub fn new(config: Arc<SearchConfig>) -> Self {
        Self {
            inner: Arc::new(EngineState {
                config,
                cache: RwLock::new(None),
                in_flight: Mutex::new(None),
                rebuilds: AtomicUsize::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    /// Number of scans started by this engine.
    pub fn rebuild_count(&self) -> usize {
        self.inner.rebuilds.load(Ordering::SeqCst)
    }

    /// The currently published cache, without checking freshness.
    pub async fn snapshot(&self) -> Option<Arc<SearchCache>> {
        self.inner.cache.read().await.clone()
    }

    /// Forces a rebuild, joining one that is already running.
    pub async fn rebuild(&self) -> Result<Arc<SearchCache>, SearchError> {
        self.refresh(true, None).await
    }

    /// Joins the running rebuild or starts one.
    ///
    /// Unless `force` is set, a cache published after the caller observed
    /// `observed` is returned instead of scanning again.
    async fn refresh(
        &self,
        force: bool,
        observed: Option<&Arc<SearchCache>>,
    ) -> Result<Arc<SearchCache>, SearchError> {
        let future = {
            let mut in_flight = self.inner.in_flight.lock().await;
            if let Some(future) = in_flight.as_ref() {
                tracing::debug!("Awaiting in-flight cache rebuild");
                future.clone()
            } else {
                if !force
                    && let Some(current) = self.snapshot().await
                    && !observed.is_some_and(|seen| Arc::ptr_eq(seen, &current))
                {
                    tracing::debug!("Search cache was rebuilt concurrently");
                    return Ok(current);
                }

                let state = Arc::clone(&self.inner);
                let handle = tokio::spawn(state.run_rebuild());
                let rebuild: BoxFuture<'static, Result<Arc<SearchCache>, Arc<SearchError>>> =
                    async move {
                        match handle.await {
                            Ok(result) => result,
                            Err(e) => Err(Arc::new(SearchError::cache_with(
                                "Cache rebuild task failed",
                                e,
                            ))),
                        }
                    }
                    .boxed();
                let shared = rebuild.shared();
                *in_flight = Some(shared.clone());
                shared
            }
        };

        future
            .await
            .map_err(|e| SearchError::cache_with("Cache rebuild failed", e))
    }

    /// Runs a query, propagating cache failures.
    ///
    /// Queries shorter than the configured minimum (after trimming) return no
    /// results without touching the cache or the file system.
    pub async fn try_search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let config = &self.inner.config;
        let query = query.trim();
        if query.chars().count() < config.search.min_query_length.max(1) {
            tracing::debug!("Query {:?} below minimum length, skipping", query);
            return Ok(Vec::new());
        }

        let limit = options.limit.unwrap_or(config.search.max_results);
        let cache = self.current_cache().await?;
        let start = Instant::now();
        let results = search_in_cache(&cache, query, limit, config);
        tracing::debug!(
            "Query {:?} ({:?}) returned {} results in {:?}",
            query,
            options.mode,
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }

    /// Runs a query; any failure is logged and reported as no results.
    pub async fn search(&self, query: &str, options: SearchOptions) -> Vec<SearchResult> {
        match self.try_search(query, options).await {
            Ok(results) => results,
            Err(e) => {
                tracing::error!("Search failed for {:?}: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Returns a cache fresh enough to query, rebuilding when it is missing,
    /// past its TTL, or out of date with the content tree.
    pub async fn current_cache(&self) -> Result<Arc<SearchCache>, SearchError> {
        let Some(cache) = self.snapshot().await else {
            tracing::info!("No search cache yet, building");
            return self
                .refresh(false, None)
                .await
                .map_err(|e| SearchError::cache_with("Search cache unavailable", e));
        };

        let config = &self.inner.config;
        let expired = cache.is_expired(SystemTime::now(), config.cache.ttl());
        let changed = !expired && has_changes(&config.content_root, &cache.file_stats).await;
        if !expired && !changed {
            return Ok(cache);
        }

        tracing::debug!(
            "Search cache is stale (expired: {}, changed: {})",
            expired,
            changed
        );
        match self.refresh(false, Some(&cache)).await {
            Ok(fresh) => Ok(fresh),
            Err(e) => {
                tracing::warn!("Serving stale search cache: {}", e);
                Ok(cache)
            }
        }
    }
}

impl EngineState {
    /// Scans the content root and publishes the result on success.
    async fn run_rebuild(self: Arc<Self>) -> Result<Arc<SearchCache>, Arc<SearchError>> {
        tracing::info!(
            "Rebuilding search cache from {}",
            self.config.content_root.display()
        );
        let start = Instant::now();
        self.rebuilds.fetch_add(1, Ordering::SeqCst);

        let result = match scan_content(&self.config).await {
            Ok(cache) => {
                let cache = Arc::new(cache);
                *self.cache.write().await = Some(Arc::clone(&cache));
                tracing::info!(
                    "Search cache rebuilt: {} entries, {} file stats in {:?}",
                    cache.len(),
                    cache.file_stats.len(),
                    start.elapsed()
                );
                Ok(cache)
            }
            Err(e) => {
                tracing::error!("Search cache rebuild failed: {}", e);
                Err(Arc::new(e))
            }
        };

        *self.in_flight.lock().await = None;
        result
    }
}

impl SearchBackend for SearchEngine {
    fn name(&self) -> &'static str {
        "primary"
    }

    fn try_search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send {
        Self::try_search(self, query, options)
    }
}

impl SearchBackend for super::legacy::LegacySearchEngine {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn try_search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> impl Future<Output = Result<Vec<SearchResult>, SearchError>> + Send {
        Self::try_search(self, query, options)
    }
}
