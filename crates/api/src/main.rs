use anyhow::Context;

use marketplace_api::{ApiConfig, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    marketplace_observability::init();

    let app = build_app(&config).await.context("failed to build application")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        vendor = %config.api_vendor,
        default_version = config.default_api_version,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
