use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ai_client::Claude;
use terascout_common::Config;
use terascout_engine::{EngineDeps, ScoutEngineWorkflow, ScoutEngineWorkflowImpl};
use terascout_fetch::HttpFetcher;
use terascout_notify::HttpEmailSender;
use terascout_store::ScoutStore;

use terascout_api::{build_router, AppState, EngineClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("terascout=info".parse()?))
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    terascout_store::migrate(&pool).await?;
    tracing::info!("migrations complete");

    let fetcher = Arc::new(HttpFetcher::new());
    let email_sender = Arc::new(HttpEmailSender::new(
        config.email_api_url.clone(),
        config.email_api_key.clone(),
    ));

    let engine_deps = Arc::new(EngineDeps::from_config(
        pool.clone(),
        config.clone(),
        fetcher,
        email_sender,
    )?);

    let claude = Claude::new(config.anthropic_api_key.clone(), "claude-sonnet-4-20250514");

    let state = Arc::new(AppState {
        store: ScoutStore::new(pool),
        config: config.clone(),
        claude,
        engine: EngineClient::new(config.restate_ingress_url.clone()),
    });

    // Restate endpoint hosting the one workflow this control plane drives.
    let restate_endpoint = restate_sdk::endpoint::Endpoint::builder()
        .bind(ScoutEngineWorkflowImpl::with_deps(engine_deps).serve())
        .build();

    let axum_app = build_router(state);

    let restate_addr = "0.0.0.0:9080".to_string();
    let axum_addr = format!("{}:{}", config.api_host, config.api_port);

    tracing::info!(restate = %restate_addr, axum = %axum_addr, "starting terascout servers");

    let restate_handle = tokio::spawn(async move {
        restate_sdk::http_server::HttpServer::new(restate_endpoint)
            .listen_and_serve(restate_addr.parse().unwrap())
            .await;
    });

    let axum_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(&axum_addr).await.unwrap();
        axum::serve(listener, axum_app).await.unwrap();
    });

    tokio::select! {
        _ = restate_handle => {},
        _ = axum_handle => {},
    }

    Ok(())
}
