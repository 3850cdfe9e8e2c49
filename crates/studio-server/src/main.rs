use tracing_subscriber::EnvFilter;

use studio_server::config::ServerConfig;
use studio_server::{build_app, shutdown_signal};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = ServerConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let addr = config.listen_addr();
    let csv_path = config.storage.csv_path.clone();
    let (app, _state) = build_app(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %csv_path, "Architecture Studio API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// `RUST_LOG` filters (default `info`); `STUDIO_LOG_FORMAT=json` selects JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("STUDIO_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
