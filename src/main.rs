use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use webhook_dedup::application::context::AppContext;
use webhook_dedup::application::usecases::ensure_schema::EnsureSchemaUseCase;
use webhook_dedup::application::usecases::sweep_expired_events::SweepExpiredEventsUseCase;
use webhook_dedup::config::{self, DbBackend};
use webhook_dedup::domain::services::webhook_event_handler::LoggingWebhookEventHandler;
use webhook_dedup::infrastructure::db::postgres::{PostgresConfig, PostgresDatabase};
use webhook_dedup::infrastructure::db::repositories::Repositories;
use webhook_dedup::interface::http;
use webhook_dedup::interface::http::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Step 1: Install structured logging.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Step 2: Load configuration.
    let settings = config::load()?;

    // Step 3: Open the store and make sure the uniqueness guard exists.
    let (repos, db) = match settings.db.backend {
        DbBackend::Postgres => {
            let db = Arc::new(
                PostgresDatabase::connect(&PostgresConfig::from_settings(&settings.db)).await?,
            );
            EnsureSchemaUseCase { db: db.clone() }
                .execute()
                .await
                .map_err(|e| format!("ensure schema: {e:?}"))?;
            (Repositories::postgres(db.clone()), Some(db))
        }
        DbBackend::Memory => {
            warn!("using in-memory webhook event store; claims are lost on restart");
            (Repositories::memory(), None)
        }
    };

    // Step 4: Assemble shared application context and HTTP state.
    let metrics = PrometheusBuilder::new().install_recorder()?;
    let ctx = Arc::new(AppContext::new(
        repos,
        Arc::new(LoggingWebhookEventHandler),
        settings.retention.clone(),
    ));
    let state = AppState {
        ctx: ctx.clone(),
        metrics: Some(metrics),
    };

    // Step 5: Start the expiry sweeper.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sweeper_ctx = ctx.clone();
    let sweep_interval = settings.retention.sweep_interval();
    let sweeper = tokio::spawn(async move {
        SweepExpiredEventsUseCase::run_loop(&sweeper_ctx, sweep_interval, shutdown_rx).await;
    });

    // Step 6: Bind and serve until ctrl-c.
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, http::app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    // Step 7: Stop the sweeper, then release the pool.
    let _ = shutdown_tx.send(true);
    let _ = sweeper.await;
    if let Some(db) = db {
        db.close().await;
    }
    info!("shutdown complete");
    Ok(())
}
