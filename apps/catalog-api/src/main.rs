//! Catalog API - storefront catalog and contact-form backend

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{DatabaseConnection, check_health_detailed};
use domain_catalog::{CatalogService, ImageStore, PgCatalogRepository};
use domain_contact::{ContactService, SmtpMailer};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    // Wire up the two independent verticals
    let images = ImageStore::new(config.images.clone());
    let catalog_service = CatalogService::new(PgCatalogRepository::new(db.clone()), images);
    let contact_service = ContactService::new(SmtpMailer::new(config.mailer.clone()));

    let api_routes = domain_catalog::handlers::router(catalog_service)
        .nest("/contact", domain_contact::handlers::router(contact_service));

    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    // /health is a plain liveness probe; /ready pings the database
    let app = router
        .merge(health_router(config.app.clone()))
        .merge(ready_router(db.clone()));

    info!("Starting Catalog API on port {}", config.server.port);

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connection");
        if let Err(e) = db.close().await {
            tracing::warn!("Failed to close database connection: {}", e);
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}

#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Readiness probe that runs a real `SELECT 1` against PostgreSQL.
async fn ready_handler(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    let status = check_health_detailed(&db).await;

    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = ReadyResponse {
        status: if status.healthy { "ready" } else { "not ready" },
        response_time_ms: status.response_time_ms,
        message: status.message,
    };

    (code, Json(body))
}

fn ready_router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready_handler)).with_state(db)
}
