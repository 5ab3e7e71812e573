//! cgp-dash - CGP sales dashboard service
//!
//! Serves the lead pipeline, course catalog, goals and AI assistant over
//! HTTP, backed by fixtures, a PostgREST project or a local SQLite file.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cgp_common::config::{
    load_toml_config, CliOverrides, DashboardConfig, StoreBackend, ENV_SUPABASE_ANON_KEY,
    ENV_SUPABASE_URL,
};
use cgp_common::events::{EventBus, DEFAULT_EVENT_CAPACITY};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use cgp_dash::assistant::Assistant;
use cgp_dash::service::DataService;
use cgp_dash::store::{RestStore, SqliteStore, TableStore};
use cgp_dash::AppState;

/// Command-line arguments for cgp-dash
#[derive(Parser, Debug)]
#[command(name = "cgp-dash")]
#[command(about = "Sales dashboard service for CGP training courses")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<String>,

    /// Data backend: fixtures, rest or sqlite
    #[arg(long)]
    backend: Option<StoreBackend>,

    /// PostgREST project URL
    #[arg(long, env = ENV_SUPABASE_URL)]
    supabase_url: Option<String>,

    /// PostgREST anon key
    #[arg(long, env = ENV_SUPABASE_ANON_KEY, hide_env_values = true)]
    supabase_key: Option<String>,

    /// SQLite database file for the sqlite backend
    #[arg(long)]
    sqlite_path: Option<PathBuf>,

    /// Generative-AI API key
    #[arg(long)]
    api_key: Option<String>,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.bind.clone(),
            backend: self.backend,
            store_url: self.supabase_url.clone(),
            store_key: self.supabase_key.clone(),
            sqlite_path: self.sqlite_path.clone(),
            ai_api_key: self.api_key.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; the configured level is applied once the config
    // is resolved unless RUST_LOG is set
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cgp-dash (CGP sales dashboard)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let toml_config = load_toml_config(args.config.as_deref())?;
    let config = DashboardConfig::resolve(&args.overrides(), &toml_config)?;
    if !from_env {
        match EnvFilter::try_new(&config.log_level) {
            Ok(level) => {
                if let Err(e) = filter_handle.reload(level) {
                    warn!("Failed to apply log level: {}", e);
                }
            }
            Err(e) => warn!("Invalid log level {:?}: {}", config.log_level, e),
        }
    }

    let store = open_store(&config).await?;
    let data = DataService::new(store, EventBus::new(DEFAULT_EVENT_CAPACITY));
    data.refresh().await;

    let assistant = Assistant::from_settings(&config.ai);
    if assistant.is_configured() {
        info!("AI assistant enabled (model {})", config.ai.model);
    } else {
        warn!("AI assistant disabled: no API key configured");
    }

    let state = AppState::new(data, assistant);
    let app = cgp_dash::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Backing store for the configured backend; `None` runs on fixtures
async fn open_store(config: &DashboardConfig) -> Result<Option<Arc<dyn TableStore>>> {
    let store: Option<Arc<dyn TableStore>> = match config.store.backend {
        StoreBackend::Fixtures => None,
        StoreBackend::Rest => match (&config.store.url, &config.store.anon_key) {
            (Some(url), Some(key)) => {
                info!("Using REST store at {}", url);
                Some(Arc::new(
                    RestStore::new(url, key).context("Failed to create REST client")?,
                ))
            }
            _ => None,
        },
        StoreBackend::Sqlite => {
            info!("Using SQLite store at {}", config.store.sqlite_path.display());
            Some(Arc::new(
                SqliteStore::open(&config.store.sqlite_path)
                    .await
                    .context("Failed to open SQLite store")?,
            ))
        }
    };
    Ok(store)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
