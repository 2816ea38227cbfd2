//! Server binary: load configuration, wire the pipeline, serve.

use anyhow::Result;
use tracing::info;

use server::AppConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        uploads = %config.upload_dir.display(),
        data = %config.data_dir.display(),
        "configuration loaded"
    );

    server::run(config).await
}
