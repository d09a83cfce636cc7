use anyhow::Context;

use agenda_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the process environment still applies.
    let _ = dotenvy::dotenv();
    agenda_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = agenda_api::app::services::build_services(&config).await?;
    let app = agenda_api::app::build_app(services, &config.api_prefix);

    let listener = tokio::net::TcpListener::bind(config.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.http_addr))?;

    tracing::info!(
        prefix = %config.api_prefix,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
