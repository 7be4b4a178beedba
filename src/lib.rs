pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod resolver;
pub mod search;
pub mod tools;
pub mod tracing;
pub mod types;

pub use config::SearchConfig;
pub use context::{ContextAwareMatcher, ContextDocument, DocumentMetadata};
pub use error::{Result, SearchError, SearchErrorCode};
pub use resolver::{KeywordResolver, ResolveStrategy, ResolvedKeyword};
pub use search::{LegacySearchEngine, SearchBackend, SearchCache, SearchEngine};
pub use types::{IndexEntry, SearchMode, SearchOptions, SearchResult, SourceType};
