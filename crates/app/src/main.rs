//! Language portal server binary.
//!
//! # Commands
//!
//! - `serve` - Run the JSON API over a `SQLite` database
//! - `seed` - Insert a demo data set

mod config;
mod seed;

use anyhow::Context;
use clap::{Parser, Subcommand};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_BIND, DEFAULT_DB_URL, ServeConfig, normalize_sqlite_url};

/// Vocabulary study portal.
#[derive(Parser)]
#[command(name = "portal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API
    Serve {
        /// Database URL or path
        #[arg(long, env = "PORTAL_DB_URL", default_value = DEFAULT_DB_URL)]
        db: String,

        /// Address to listen on
        #[arg(long, env = "PORTAL_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },

    /// Insert demo groups, words, activities and a session
    Seed {
        /// Database URL or path
        #[arg(long, env = "PORTAL_DB_URL", default_value = DEFAULT_DB_URL)]
        db: String,
    },
}

async fn open_services(db_url: &str) -> anyhow::Result<AppServices> {
    config::prepare_sqlite_file(db_url)?;
    AppServices::new_sqlite(db_url, Clock::default())
        .await
        .with_context(|| format!("opening {db_url}"))
}

async fn serve(config: ServeConfig) -> anyhow::Result<()> {
    let services = open_services(&config.db_url).await?;
    let router = api::router(&services);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    tracing::info!(addr = %config.bind, db = %config.db_url, "portal listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await?;
    tracing::info!("portal stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve { db, bind } => serve(ServeConfig::resolve(&db, &bind)?).await,
        Commands::Seed { db } => {
            let db_url = normalize_sqlite_url(&db);
            let services = open_services(&db_url).await?;
            seed::run(&services).await
        }
    }
}
