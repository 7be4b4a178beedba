//! Immutable snapshot of the scanned content tree.

use crate::types::IndexEntry;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Modification times keyed by the path they were observed at.
pub type FileStats = HashMap<PathBuf, SystemTime>;

/// One complete scan of the content root.
///
/// A cache is built once by the scanner and never mutated after it is
/// published; rebuilds produce a new value.
#[derive(Debug, Clone)]
pub struct SearchCache {
    /// Entries keyed by [`IndexEntry::id`].
    pub index: HashMap<String, IndexEntry>,
    /// Every file and directory visited during the scan, including the root.
    pub file_stats: FileStats,
    /// Wall-clock time the scan started.
    pub timestamp: SystemTime,
}

impl SearchCache {
    pub fn new(timestamp: SystemTime) -> Self {
        Self {
            index: HashMap::new(),
            file_stats: HashMap::new(),
            timestamp,
        }
    }

    /// Whether the cache is at least `ttl` old at `now`.
    ///
    /// A timestamp in the future (clock moved backwards) counts as fresh.
    pub fn is_expired(&self, now: SystemTime, ttl: Duration) -> bool {
        now.duration_since(self.timestamp)
            .is_ok_and(|age| age >= ttl)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
