// rest/mod.rs — Public HTTP API server.
//
// Axum server bound to {bind_address}:{port} (local only by default).
//
// Endpoints:
//   POST   /api/gemini          — letter-enhancement proxy
//   GET    /api/memories
//   POST   /api/memories
//   GET    /api/memories/{id}
//   DELETE /api/memories/{id}
//   GET    /api/health
//
// With assets_dir configured, unmatched routes serve the SPA.

pub mod routes;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("memory box listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    let assets_dir = ctx.config.assets_dir.clone();

    let router = Router::new()
        // Enhancement proxy
        .route("/api/gemini", post(routes::gemini::enhance))
        // Memories
        .route(
            "/api/memories",
            get(routes::memories::list_memories).post(routes::memories::create_memory),
        )
        .route(
            "/api/memories/{id}",
            get(routes::memories::get_memory).delete(routes::memories::delete_memory),
        )
        // Health
        .route("/api/health", get(routes::health::health))
        .with_state(ctx);

    let router = match assets_dir {
        Some(dir) => router
            .fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received — closing the box");
}
