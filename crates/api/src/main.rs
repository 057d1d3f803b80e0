use anyhow::Context;

use pedalshare_infra::AppConfig;

fn main() -> anyhow::Result<()> {
    pedalshare_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let app = pedalshare_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        workers = config.worker_threads,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
