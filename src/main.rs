mod commands;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use memoria::{ChromaVectorStore, Config};
use tracing_subscriber::EnvFilter;

/// memoria - semantic memory for AI agents
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "memoria=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    memoria::setup();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                output::print_json(&output::ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> memoria::Result<ExitCode> {
    if matches!(cli.command, commands::Commands::Version) {
        return commands::handle_version(cli.json);
    }

    let config = Config::load()?;
    config.ensure_directories()?;

    let provider = Arc::new(config.embedding_provider());
    let store = ChromaVectorStore::new(provider, config.chroma_client()?, &config.collection);

    commands::execute(&cli.command, &store, &config, cli.json).await
}
