//! HTTP surface: route table, middleware and the OpenAPI document.

use crate::errors::ErrorResponse;
use crate::handlers::{self, AppState};
use crate::models::{MessageResponse, PoliciesResponse, PolicySummary};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "청년정책 API"),
    paths(
        handlers::health,
        handlers::get_address_policies,
        handlers::get_top_policies
    ),
    components(schemas(PolicySummary, PoliciesResponse, MessageResponse, ErrorResponse)),
    tags(
        (name = "address", description = "주소 기반 정책"),
        (name = "rank", description = "랭킹 정책"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Builds the application router with docs, tracing and CORS.
pub fn router(state: Arc<AppState>) -> Router {
    let policy_routes = Router::new()
        .route("/addr/policies", get(handlers::get_address_policies))
        .route("/rank/top10", get(handlers::get_top_policies));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(policy_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
