//! Entry point for the segmentation HTTP server.
use segmenter::config::ServerConfig;
use segmenter::{logging, server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::load()?;
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("Logging disabled: {err}");
    }
    tracing::info!(
        bind = %config.bind_addr,
        default_clusters = config.clustering.n_clusters,
        n_init = config.clustering.n_init,
        "Starting segmenter {}",
        env!("CARGO_PKG_VERSION")
    );
    server::serve(config).await?;
    Ok(())
}
