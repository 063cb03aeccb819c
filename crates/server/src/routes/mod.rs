pub mod health;
pub mod root;
pub mod schedule;

use crate::{doc::ApiDoc, utils::clock::Clock};
use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared by every request; holds no mutable state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub clock: Arc<dyn Clock>,
    pub strict_query_params: bool,
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/schedule", get(schedule::list_schedules))
        .route("/schedule/", get(schedule::list_schedules));

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .merge(api.clone())
        .nest("/api/v1", api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
