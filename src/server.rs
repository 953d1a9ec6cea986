use crate::error::AppError;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use cloudflare_exporter_collector::{
    Orchestrator,
    RegistrySink,
};
use eyre::Result;
use std::{
    future::Future,
    net::SocketAddr,
    sync::Arc,
};
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn create_router(orchestrator: Arc<Orchestrator>) -> Router {
    let state = AppState { orchestrator };

    Router::new()
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Runs one collection cycle and renders it. The cycle runs on its own task so
/// it completes even when the scraper goes away.
async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orchestrator = state.orchestrator.clone();
    let sink = tokio::spawn(async move {
        let mut sink = RegistrySink::new();
        orchestrator.collect(&mut sink).await;
        sink
    })
    .await?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], sink.render()?))
}

async fn healthz() -> &'static str {
    "ok"
}

pub async fn start_server(listen_address: SocketAddr, orchestrator: Arc<Orchestrator>) -> Result<()> {
    let listener = TcpListener::bind(listen_address).await?;
    serve(listener, orchestrator, shutdown_signal()).await
}

/// Serves the exporter on `listener` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    orchestrator: Arc<Orchestrator>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, create_router(orchestrator))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "Could not listen for the shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
