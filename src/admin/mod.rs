//! Read-only diagnostics endpoint.
//!
//! - `GET /status`: version and every checker's snapshot
//! - `GET /status/{name}`: one checker, 404 when unknown

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::health::StatusRegistry;
use self::handlers::*;

/// State shared by the diagnostics handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<StatusRegistry>,
}

pub fn setup_admin_router(registry: StatusRegistry) -> Router {
    let state = AdminState {
        registry: Arc::new(registry),
    };
    Router::new()
        .route("/status", get(get_status))
        .route("/status/{name}", get(get_checker))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the diagnostics endpoint until shutdown.
pub async fn serve(
    listener: TcpListener,
    registry: StatusRegistry,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Diagnostics endpoint listening");

    axum::serve(listener, setup_admin_router(registry))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Diagnostics endpoint stopped");
    Ok(())
}
