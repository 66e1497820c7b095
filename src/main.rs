//! SearchBox-RS: hot list and autocomplete search box for video search engines
//!
//! Serves the search box on a local page.

use anyhow::Result;
use clap::Parser;
use searchbox_rs::{
    broadcast::SuggestionService,
    config::{self, Settings},
    engines::DriverLoader,
    network::HttpClient,
    searchbox::{SearchBox, SearchBoxOptions, SearchPages, SystemBrowser},
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

/// Command line options
#[derive(Debug, Parser)]
#[command(name = "searchbox-rs", version, about)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; the settings file may lower or raise the level later
    let rust_log = EnvFilter::try_from_default_env().ok();
    let env_overrides = rust_log.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(rust_log.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    info!("Starting SearchBox-RS v{}", searchbox_rs::VERSION);

    // Load configuration
    let path = config::locate(cli.config.as_deref());
    let mut settings = match config::load(path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {:#}", e);
            return Err(e);
        }
    };
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(bind) = cli.bind {
        settings.server.bind_address = bind;
    }

    if !env_overrides {
        let level = log_level(&settings);
        filter_handle.modify(|filter| *filter = EnvFilter::new(level))?;
    }

    match path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }
    let settings = config::init(settings)?;

    // Initialize HTTP client
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    // Load drivers
    let registry = DriverLoader::load(settings, &client)?;

    // Build the search box
    let service = Arc::new(SuggestionService::new());
    let search_box = Arc::new(SearchBox::new(
        Arc::new(registry),
        &service,
        SearchPages::from_settings(settings)?,
        Arc::new(SystemBrowser),
        SearchBoxOptions::from_settings(settings),
    ));
    search_box.init();

    let state = AppState::new(settings.clone(), search_box.clone(), service)?;
    let app = create_router(state);

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    search_box.destroy();
    info!("Server stopped");

    Ok(())
}

/// Level applied once settings are loaded, unless `RUST_LOG` is set
fn log_level(settings: &Settings) -> &str {
    if settings.general.debug {
        "debug"
    } else {
        &settings.general.log_level
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
