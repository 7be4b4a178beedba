//! Document search over a directory tree of front-matter documents.
//!
//! The primary engine scans the content root into an in-memory cache, keeps
//! it fresh with a TTL plus modification-time change detection, and scores
//! entries by field-priority substring matching. A token-based legacy
//! engine is kept as a fallback.

// Module declarations
pub(crate) mod cache;
pub(crate) mod detector;
pub(crate) mod engine;
pub(crate) mod frontmatter;
pub(crate) mod index;
pub(crate) mod legacy;
pub(crate) mod scanner;
pub(crate) mod scoring;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use cache::{FileStats, SearchCache};
pub use engine::{SearchBackend, SearchEngine};
pub use frontmatter::{FrontMatter, FrontMatterError, ParsedDocument, parse as parse_front_matter};
pub use legacy::{LegacyIndex, LegacySearchEngine};
pub use scoring::{ScoredField, create_excerpt};
