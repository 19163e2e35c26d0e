//! Command handlers for the memoria CLI.

use crate::output::*;
use memoria::errors::Error;
use memoria::metadata::parse_metadata;
use memoria::{ChromaVectorStore, Config, Metadata, SearchOptions, VectorStore};
use std::process::ExitCode;

/// Commands supported by the memoria CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    Add {
        /// Memory text content
        text: String,

        /// Optional JSON object of metadata
        #[arg(short = 'm', long)]
        metadata: Option<String>,
    },
    Search {
        /// Search query text
        query: String,

        /// Maximum number of results (default: configured search limit)
        #[arg(short = 'l', long)]
        limit: Option<usize>,
    },
    Forget {
        /// Memory ID
        id: String,
    },
    /// Remove every memory in the collection
    Clear,
    /// Number of stored memories
    Count,
    Version,
}

/// Execute a CLI command against the store.
pub async fn execute(
    command: &Commands,
    store: &ChromaVectorStore,
    config: &Config,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Add { text, metadata } => handle_add(store, text, metadata.as_deref(), json).await,
        Commands::Search { query, limit } => {
            handle_search(store, query, limit.unwrap_or(config.search_limit), json).await
        }
        Commands::Forget { id } => handle_forget(store, id, json).await,
        Commands::Clear => handle_clear(store, json).await,
        Commands::Count => handle_count(store, json).await,
        Commands::Version => handle_version(json),
    }
}

fn parse_metadata_arg(metadata: Option<&str>) -> Result<Metadata, Error> {
    match metadata {
        Some(raw) => parse_metadata(raw)
            .map_err(|e| Error::InvalidInput(format!("metadata must be a JSON object: {e}"))),
        None => Ok(Metadata::new()),
    }
}

async fn handle_add(
    store: &dyn VectorStore,
    text: &str,
    metadata: Option<&str>,
    json: bool,
) -> Result<ExitCode, Error> {
    let metadata = parse_metadata_arg(metadata)?;
    let item = store.add(text, metadata).await?;
    if json {
        print_json(&AddResponse {
            status: "added".to_string(),
            id: item.id,
        });
    } else {
        println!("Added memory: {}", item.id);
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_search(
    store: &dyn VectorStore,
    query: &str,
    limit: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let results = store.search(query, SearchOptions::with_limit(limit)).await?;
    if json {
        let results: Vec<SearchResultItem> = results
            .into_iter()
            .map(|r| SearchResultItem {
                id: r.item.id,
                content: r.item.content,
                score: r.score,
                metadata: r.item.metadata,
            })
            .collect();
        print_json(&SearchResponse { results });
    } else {
        for result in results {
            println!(
                "{} [score: {:.2}]\n  {}\n",
                result.item.id, result.score, result.item.content
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_forget(store: &dyn VectorStore, id: &str, json: bool) -> Result<ExitCode, Error> {
    store.forget(id).await?;
    if json {
        print_json(&ForgetResponse {
            status: "forgotten".to_string(),
            id: id.to_string(),
        });
    } else {
        println!("Forgot memory: {}", id);
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_clear(store: &dyn VectorStore, json: bool) -> Result<ExitCode, Error> {
    store.clear().await?;
    if json {
        print_json(&StatusResponse {
            status: "cleared".to_string(),
        });
    } else {
        println!("Cleared all memories");
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_count(store: &ChromaVectorStore, json: bool) -> Result<ExitCode, Error> {
    let count = store.count().await?;
    if json {
        print_json(&CountResponse {
            collection: store.collection_name().to_string(),
            count,
        });
    } else {
        println!("{count}");
    }
    Ok(ExitCode::SUCCESS)
}

pub fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
