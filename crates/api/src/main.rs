use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use nearbykaam_api::app::{build_app, services::AppServices};
use nearbykaam_infra::AppConfig;

const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nearbykaam_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = Arc::new(AppServices::from_config(&config).context("failed to initialise services")?);
    let _sweeper = services.spawn_expiry_sweeper(EXPIRY_SWEEP_INTERVAL);

    let app = build_app(services, &config.jwt_secret);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
