use anyhow::Context;
use clap::Parser;
use docs_search::cli::{Cli, Commands};
use docs_search::tools::search::{SearchRequest, format_results, get_suggestions, search_documents};
use docs_search::{KeywordResolver, LegacySearchEngine, SearchConfig, SearchEngine};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docs_search::tracing::init_with(cli.json_logs);

    let mut config = match &cli.config {
        Some(path) => SearchConfig::load(path)?,
        None => SearchConfig::from_env_or_default()?,
    };
    if let Some(root) = cli.root {
        config.content_root = root;
    }
    let config = Arc::new(config);

    tracing::debug!("Using content root {}", config.content_root.display());
    let engine = SearchEngine::new(Arc::clone(&config));

    match cli.command {
        Commands::Search { query, limit } => {
            let legacy = LegacySearchEngine::new(Arc::clone(&config));
            let request = SearchRequest { query, limit };
            let results = search_documents(&engine, &legacy, &request).await;
            println!("{}", format_results(&request.query, &results));
        }
        Commands::Suggest { query, limit } => {
            let limit = limit.unwrap_or(config.search.suggestion_limit);
            for result in get_suggestions(&engine, &query, limit).await {
                println!("{}\t{}", result.entry.title, result.entry.path);
            }
        }
        Commands::Resolve {
            keyword,
            context,
            strategy,
            max_related,
        } => {
            let context = match context {
                Some(path) => Some(
                    tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("Failed to read context file {}", path.display()))?,
                ),
                None => None,
            };

            let documents: Vec<_> = match engine.current_cache().await {
                Ok(cache) => cache.index.values().cloned().collect(),
                Err(e) => {
                    tracing::error!("Search cache unavailable for keyword resolution: {}", e);
                    Vec::new()
                }
            };

            let mut resolver =
                KeywordResolver::new(strategy.into()).with_max_related_keywords(max_related);
            let resolved = resolver.resolve(&keyword, &documents, context.as_deref());
            println!("{}", resolved);
        }
        Commands::Stats => {
            let cache = engine
                .rebuild()
                .await
                .context("Failed to build search index")?;
            println!("Content root: {}", config.content_root.display());
            println!("Documents:    {}", cache.len());
            println!("Paths seen:   {}", cache.file_stats.len());
        }
    }

    Ok(())
}
