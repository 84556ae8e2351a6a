use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::checker::{BatchRunner, CheckService};

pub mod error;
pub mod models;
pub mod routes;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub checker: Arc<CheckService>,
    pub batch: Arc<BatchRunner>,
    pub cron_secret: Option<String>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route(
            "/api/sites",
            post(routes::site_routes::create_site_handler)
                .get(routes::site_routes::list_sites_handler),
        )
        .route(
            "/api/settings",
            post(routes::settings_routes::update_settings_handler),
        )
        .route(
            "/api/sites/{id}",
            axum::routing::patch(routes::site_routes::update_site_handler)
                .delete(routes::site_routes::delete_site_handler),
        )
        .route(
            "/api/sites/{id}/changes",
            get(routes::site_routes::site_changes_handler),
        )
        .route(
            "/api/sites/{id}/check",
            post(routes::check_routes::check_site_handler),
        )
        .route(
            "/api/cron/daily-check",
            post(routes::check_routes::daily_check_handler)
                .get(routes::check_routes::daily_check_handler),
        )
        .with_state(state)
        .layer(cors)
}

pub async fn run_http_server(
    state: Arc<AppState>,
    http_addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app_router = build_router(state);

    info!("HTTP server listening on {http_addr}");
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    axum::serve(listener, app_router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
