mod api;
mod config;
mod enrich;
mod error;
mod gemini;
mod github;
mod models;
mod query;
mod service;
mod telemetry;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing::info;

use crate::{
    query::{SearchMode, SearchParams, SearchRequest},
    service::SearchService,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP search proxy
    Serve,
    /// Run one search and print the JSON response
    Search {
        query: String,
        /// Attach AI-generated summaries
        #[arg(long)]
        ai: bool,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        activity_days: Option<u32>,
        #[arg(long)]
        min_stars: Option<u64>,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install().wrap_err("Failed to install color-eyre error handler")?;

    let cli = Cli::parse();
    let config = config::Config::new()?;
    let telemetry = telemetry::init(config.otlp_enabled)?;

    let search = SearchService::new(&config).wrap_err("Failed to initialize search service")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            info!("Starting API server on {}:{}", config.host, config.port);
            let app = api::create_router(Arc::new(api::types::AppState { search }));

            let listener = tokio::net::TcpListener::bind((config.host, config.port))
                .await
                .wrap_err_with(|| {
                    format!("Failed to bind server to {}:{}", config.host, config.port)
                })?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .wrap_err("Failed to start API server")?;
        }
        Commands::Search {
            query,
            ai,
            language,
            activity_days,
            min_stars,
            page,
        } => {
            let request = SearchRequest::try_from(SearchParams {
                query: Some(query),
                search_type: if ai {
                    SearchMode::Enriched
                } else {
                    SearchMode::Plain
                },
                language,
                activity_days,
                min_stars,
                page: Some(page),
            })?;

            let response = search.handle(&request).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&response).wrap_err("Failed to encode response")?
            );
        }
    }

    telemetry.shutdown()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down");
}
