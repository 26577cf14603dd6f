use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use daat_core::bootstrap::{create_project_index, create_provider, create_store, load_config};
use daat_core::config::Config;
use daat_gateway::GatewayServer;
use tokio::sync::watch;

#[derive(Debug, Parser)]
#[command(name = "daat", version, about = "Per-project document index and grounded chat")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        long,
        global = true,
        env = "DAAT_CONFIG",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP gateway (default).
    Serve,
    /// Index one markdown file into a project's collection.
    Index {
        project_id: String,
        /// Path relative to `index.docs_root`, or absolute.
        file_path: String,
    },
    /// Search a project's indexed chunks.
    Search {
        project_id: String,
        query: String,
        #[arg(long)]
        limit: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .await
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Index {
            project_id,
            file_path,
        } => index(&config, &project_id, &file_path).await,
        Command::Search {
            project_id,
            query,
            limit,
        } => search(&config, &project_id, &query, limit).await,
    }
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let provider = Arc::new(create_provider(&config)?);
    let store = create_store(&config)?;
    let index = Arc::new(create_project_index(
        &config,
        store,
        Arc::clone(&provider),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let gw = &config.gateway;
    GatewayServer::new(&gw.bind, gw.port, index, provider, shutdown_rx)
        .with_auth(gw.auth_token.clone())
        .with_rate_limit(gw.rate_limit)
        .with_max_body_size(gw.max_body_size)
        .with_search_limit(config.index.search_limit)
        .with_context_chunks(config.index.context_chunks)
        .with_chat_timeout(Duration::from_secs(gw.chat_timeout_secs))
        .serve()
        .await
        .context("gateway failed")
}

async fn index(config: &Config, project_id: &str, file_path: &str) -> anyhow::Result<()> {
    let provider = Arc::new(create_provider(config)?);
    let index = create_project_index(config, create_store(config)?, provider);

    let report = index
        .indexer
        .index_document(file_path, project_id)
        .await
        .with_context(|| format!("failed to index {file_path} into project {project_id}"))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn search(
    config: &Config,
    project_id: &str,
    query: &str,
    limit: Option<u64>,
) -> anyhow::Result<()> {
    let provider = Arc::new(create_provider(config)?);
    let index = create_project_index(config, create_store(config)?, provider);

    let results = index
        .retriever
        .search(project_id, query, limit.unwrap_or(config.index.search_limit))
        .await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
