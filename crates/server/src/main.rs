//! pagesnap server entry point.
//!
//! Boots the shared browser handle and the artifact store, then serves the
//! screenshot endpoint over HTTP. The browser is launched before the
//! listener accepts traffic and is never replaced afterwards.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagesnap_core::{AppConfig, ArtifactStore};
use pagesnap_render::{HeadlessRenderer, LaunchOptions};

mod error;
mod pipeline;
mod routes;
mod state;

/// Screenshot API service.
#[derive(Debug, Parser)]
#[command(name = "pagesnap", version, about = "Screenshot API service")]
struct Cli {
    /// Port number the server will be listening on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Location of the browser executable. Auto-detected when omitted.
    #[arg(short = 'c', long = "browser")]
    browser: Option<PathBuf>,

    /// Directory screenshots are cached in.
    #[arg(long)]
    store_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("loading configuration")?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(browser) = cli.browser {
        config.browser_path = Some(browser);
    }
    if let Some(store_dir) = cli.store_dir {
        config.store_dir = store_dir;
    }
    config.validate()?;

    if let Some(path) = &config.browser_path
        && !path.exists()
    {
        bail!("cannot find browser executable at {}", path.display());
    }

    let store = ArtifactStore::new(&config.store_dir);
    store
        .ensure_root()
        .await
        .with_context(|| format!("creating store directory {}", config.store_dir.display()))?;

    let renderer = HeadlessRenderer::launch(&LaunchOptions { executable: config.browser_path.clone() })
        .await
        .context("launching browser")?;
    tracing::info!(
        store_dir = %config.store_dir.display(),
        browser = ?config.browser_path,
        "browser ready"
    );

    let state = Arc::new(state::AppState {
        store,
        renderer: Arc::new(renderer),
        vary_on_scroll: config.vary_on_scroll,
    });

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding port {}", config.port))?;
    tracing::info!(port = config.port, "server is listening");
    axum::serve(listener, app).await?;

    Ok(())
}
