mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use recruit_flow::{FlowRunner, InMemorySessionStorage, SessionStorage, recruiter_table};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{LogFormat, ServiceConfig},
    routes::{AppState, router},
};

/// Initialize tracing in the format selected by `LOG_FORMAT`
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "recruiter_chat_service=debug,recruit_flow=debug,tower_http=debug".into()
    });

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

/// Periodically drops dialogues idle for longer than the configured TTL
fn spawn_session_sweeper(runner: FlowRunner, config: &ServiceConfig) -> anyhow::Result<()> {
    let max_idle = chrono::Duration::from_std(config.session_ttl)
        .context("SESSION_TTL_SECS out of range")?;
    let mut interval = tokio::time::interval(config.session_sweep_interval);
    info!(
        ttl_secs = config.session_ttl.as_secs(),
        sweep_secs = config.session_sweep_interval.as_secs(),
        "Session sweeper started"
    );

    tokio::spawn(async move {
        loop {
            interval.tick().await;
            if let Err(e) = runner.evict_idle(max_idle).await {
                error!(error = %e, "Failed to evict idle sessions");
            }
        }
    });
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env()?;
    init_tracing(config.log_format);

    // Dialogues are ephemeral, so sessions only live in memory
    let session_storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
    let table = recruiter_table();
    info!(table = %table.id, "Loaded dialogue table");

    let runner = FlowRunner::new(Arc::new(table), session_storage);
    spawn_session_sweeper(runner.clone(), &config)?;

    let app = router(AppState { runner });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
