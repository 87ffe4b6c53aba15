//! Peerdrive DAV - WebDAV gateway for peer-replicated content drives

use clap::Parser;
use peerdrive_dav::{server, GatewayConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "peerdrive-dav")]
#[command(about = "WebDAV gateway exposing a peerdrive content drive to OS file managers")]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "PEERDRIVE_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "4919", env = "PEERDRIVE_PORT")]
    port: u16,

    /// Mount prefix the drive is served under
    #[arg(long, default_value = "/dav", env = "PEERDRIVE_MOUNT")]
    mount: String,

    /// Directory holding the drive's content
    #[arg(long, default_value = "./peerdrive-data", env = "PEERDRIVE_DATA_DIR")]
    data_dir: PathBuf,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long, env = "PEERDRIVE_MEMORY_STORE")]
    memory_store: bool,

    /// Serve the drive read-only regardless of the engine session
    #[arg(long, env = "PEERDRIVE_READ_ONLY")]
    read_only: bool,

    /// Enable debug logging
    #[arg(short, long, env = "PEERDRIVE_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("peerdrive_dav={log_level},tower_http=debug").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "starting peerdrive DAV gateway on {}:{}{}",
        args.host,
        args.port,
        args.mount
    );

    if args.memory_store {
        tracing::warn!("using in-memory storage - data will NOT persist");
    }
    if args.read_only {
        tracing::info!("serving read-only: mutating methods will be refused");
    }

    let config = GatewayConfig {
        host: args.host,
        port: args.port,
        mount: args.mount,
        data_dir: Some(args.data_dir),
        use_memory_store: args.memory_store,
        read_only: args.read_only,
    };

    server::run_server_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}
