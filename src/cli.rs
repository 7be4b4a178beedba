use crate::resolver::ResolveStrategy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docs-search")]
#[command(about = "Search a directory of documentation pages", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults to $DOCS_SEARCH_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Content root, overriding the configuration
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,
    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Full search, falling back to the legacy engine on failure
    Search {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Type-ahead suggestions
    Suggest {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Resolve a keyword to a document, optionally in the context of a page
    Resolve {
        keyword: String,
        /// File whose text is used as the context document
        #[arg(short, long)]
        context: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "adaptive")]
        strategy: StrategyArg,
        /// Maximum number of related keywords to list
        #[arg(short = 'm', long, default_value_t = 5)]
        max_related: usize,
    },
    /// Rebuild the index and print its size
    Stats,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Strict,
    Fuzzy,
    Adaptive,
}

impl From<StrategyArg> for ResolveStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Strict => Self::Strict,
            StrategyArg::Fuzzy => Self::Fuzzy,
            StrategyArg::Adaptive => Self::Adaptive,
        }
    }
}
