//! streamsyncd: the StreamSync site daemon.
//!
//! Serves the read-only JSON API and the landing page from one process.
//! The page's partials call the API over loopback, so both routers share
//! the listener configured in `[server]`.
//!
//! # Usage
//!
//! ```text
//! NEON_DATABASE_URL=postgres://... streamsyncd serve --config site.toml --port 8080
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use streamsync_api::{ApiState, api_router};
use streamsync_core::SiteConfig;
use streamsync_site::{SiteState, site_router};

const DEFAULT_CONFIG: &str = "site.toml";

#[derive(Parser)]
#[command(name = "streamsyncd", about = "StreamSync site daemon")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the API and landing page.
    Serve {
        /// Path to site.toml. Defaults to ./site.toml when present.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate the configuration, then print the resolved backends.
    CheckConfig {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Serve { config, port } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Command::CheckConfig { config } => {
            let config = load_config(config.as_deref())?;
            println!("listen:     {}:{}", config.server.bind, config.server.port);
            println!("api:        {}", config.api_address());
            println!(
                "database:   {}",
                if config.database.url.is_some() {
                    format!("configured via env ({})", config.database.url_env)
                } else {
                    "not configured".to_string()
                }
            );
            println!("changelog:  {:?}", config.changelog.source);
            println!("version:    {:?}", config.version.source);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,streamsyncd=debug,streamsync=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Explicit paths must exist; the implicit `./site.toml` is optional.
fn load_config(path: Option<&Path>) -> anyhow::Result<SiteConfig> {
    let config = match path {
        Some(path) => SiteConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            SiteConfig::from_file(Path::new(DEFAULT_CONFIG))
                .with_context(|| format!("loading config {DEFAULT_CONFIG}"))?
        }
        None => {
            info!("no site.toml found, using defaults");
            SiteConfig::default()
        }
    };
    Ok(config.with_env())
}

async fn serve(config: SiteConfig) -> anyhow::Result<()> {
    info!("StreamSync site starting");

    let api_state = ApiState::from_config(&config).context("initializing API backends")?;
    let site_state = SiteState::from_config(&config);
    info!(api = %site_state.client.address(), "presentation layer initialized");

    let router = api_router(api_state).merge(site_router(site_state));

    let addr = (config.server.bind.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}:{}", config.server.bind, config.server.port))?;
    info!(addr = %listener.local_addr()?, "listening");

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => {
                    error!(error = %e, "failed to install Ctrl-C handler");
                    warn!("running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("StreamSync site stopped");
    Ok(())
}
