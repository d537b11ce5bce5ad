use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zk_hub::{AnimalStore, AppState, Config};
use zk_io::FileStore;

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "zk-hub", version, about = "Zookeepr animal API server")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Path to config file
    #[arg(long, default_value = "zookeepr.toml")]
    config: PathBuf,

    /// Animal document path (overrides `store.data_path`)
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "zk_hub=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config);
    if let Some(data) = args.data {
        config.store.data_path = data;
    }

    let backend = FileStore::new(&config.store.data_path);
    let data_path = backend.path().to_path_buf();
    let (animals, source) = match AnimalStore::open(Box::new(backend)) {
        Ok(opened) => opened,
        Err(e) => {
            tracing::error!("Failed to load animals from {}: {}", data_path.display(), e);
            std::process::exit(1);
        }
    };
    let count = animals.len().await;

    let state = Arc::new(AppState::new(animals));
    let app = zk_hub::app(state, &config.server);

    let addr: SocketAddr = match format!("{}:{}", args.host, args.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid bind address {}:{}: {}", args.host, args.port, e);
            std::process::exit(1);
        }
    };

    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    tracing::info!("  🦁 Zookeepr v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  API:      http://{}/api/animals", addr);
    tracing::info!("  Data:     {}", data_path.display());
    tracing::info!("  Animals:  {} ({:?})", count, source);
    tracing::info!("  Public:   {}", config.server.public_dir.display());
    tracing::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
