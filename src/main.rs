mod auth;
mod config;
mod error;
mod format;
mod http;
mod parser;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use crate::auth::StaticKeyAuthenticator;
use crate::config::Settings;
use crate::store::rest::RestStore;
use crate::store::{Tender, TenderQuery, TenderStore};

#[derive(Parser)]
#[command(name = "tender_gateway", about = "Read-only HTTP gateway over the tenders table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Listen address (overrides TENDER_BIND)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run the field extractor over a local text file
    Extract {
        path: PathBuf,
        /// Only look for the EMD amount
        #[arg(long)]
        emd_only: bool,
    },
    /// Query the tenders table once and print the result envelope
    Tenders {
        #[arg(short = 'n', long)]
        limit: Option<String>,
        /// Search phrase (words are OR-combined)
        #[arg(short, long)]
        q: Option<String>,
        #[arg(short, long)]
        bid_number: Option<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn load_settings() -> anyhow::Result<Settings> {
    let settings = Settings::from_env().context("loading TENDER_* configuration")?;
    info!(settings_loaded = ?settings, "configuration loaded");
    Ok(settings)
}

fn rest_store(settings: &Settings) -> RestStore {
    RestStore::new(&settings.store_url, &settings.store_key, &settings.table)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind } => {
            let settings = load_settings()?;
            let addr = bind.unwrap_or_else(|| settings.bind.clone());
            let state = http::AppState {
                store: Arc::new(rest_store(&settings)),
                auth: Arc::new(StaticKeyAuthenticator::new(settings.api_key.clone())),
                settings: Arc::new(settings),
            };
            let app = http::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(addr = %addr, "tender gateway listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("server error")?;
            info!("shut down");
            Ok(())
        }
        Commands::Extract { path, emd_only } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let out = if emd_only {
                let emd_amount = parser::extract_emd(&text)
                    .unwrap_or_else(|| parser::NOT_FOUND.to_string());
                json!({ "emd_amount": emd_amount })
            } else {
                serde_json::to_value(parser::extract_details(&text))?
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
        Commands::Tenders { limit, q, bid_number } => {
            let settings = load_settings()?;
            let store = rest_store(&settings);
            let query = TenderQuery::new(
                settings.resolve_limit(limit.as_deref()),
                q.as_deref(),
                bid_number.as_deref(),
            );
            let data: Vec<Tender> = store
                .list_tenders(&query)
                .await?
                .into_iter()
                .map(Tender::with_display_fields)
                .collect();
            let out = json!({ "success": true, "count": data.len(), "data": data });
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
}
