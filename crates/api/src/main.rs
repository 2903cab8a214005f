use anyhow::Context;

use shelfwise_infra::AdvisorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelfwise_observability::init();

    let config = AdvisorConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr;

    let services = shelfwise_api::app::services::build_services(config).await?;
    let app = shelfwise_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
