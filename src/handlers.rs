use crate::config::Config;
use crate::enrichment;
use crate::errors::AppError;
use crate::models::*;
use crate::search::{self, SearchOutcome};
use crate::services::{AddressResolver, PolicyApiService, RankSource};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Juso address lookup client.
    pub address_resolver: AddressResolver,
    /// Youth policy search/detail client (shared connection pool).
    pub policy_api: PolicyApiService,
    /// Ranked policy list source.
    pub rank_source: RankSource,
}

impl AppState {
    /// Builds every fetcher from `config`, sharing one HTTP client between
    /// the address lookup and the policy API.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            address_resolver: AddressResolver::new(&config, client.clone()),
            policy_api: PolicyApiService::new(&config, client),
            rank_source: RankSource::new(&config),
            config,
        })
    }
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "youth-policy-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /addr/policies
///
/// Youth policies open in the region of `address`, most viewed first (at
/// most 20). Answers `{"message": "No Content"}` when nothing matches.
#[utoipa::path(
    get,
    path = "/addr/policies",
    tag = "address",
    params(AddressQuery),
    responses(
        (status = 200, description = "Matching policies, or {\"message\": \"No Content\"} when none match", body = PoliciesResponse),
        (status = 400, description = "Missing address parameter"),
        (status = 502, description = "Address lookup or policy search failed", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_address_policies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Json<AddressPoliciesResponse>, AppError> {
    let start = Instant::now();
    tracing::info!("GET /addr/policies - address: {}", params.address);

    let today = chrono::Local::now().date_naive();
    let outcome = search::search_policies(
        &state.address_resolver,
        &state.policy_api,
        &params.address,
        today,
    )
    .await?;

    let body = match outcome {
        SearchOutcome::Policies(policies) => {
            tracing::info!(
                "Address search returned {} policies in {:?}",
                policies.len(),
                start.elapsed()
            );
            AddressPoliciesResponse::Found(PoliciesResponse { policies })
        }
        SearchOutcome::Empty => {
            tracing::info!("Address search found no policies in {:?}", start.elapsed());
            AddressPoliciesResponse::Empty(MessageResponse::no_content())
        }
    };

    Ok(Json(body))
}

/// GET /rank/top10
///
/// Currently top-ranked policies with full details, most viewed first.
#[utoipa::path(
    get,
    path = "/rank/top10",
    tag = "rank",
    responses(
        (status = 200, description = "Enriched ranked policies", body = PoliciesResponse),
        (status = 502, description = "Ranking list could not be read", body = crate::errors::ErrorResponse)
    )
)]
pub async fn get_top_policies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PoliciesResponse>, AppError> {
    let start = Instant::now();
    tracing::info!("GET /rank/top10");

    let policies = enrichment::top_policies(&state.rank_source, &state.policy_api).await?;

    tracing::info!(
        "Ranking returned {} policies in {:?}",
        policies.len(),
        start.elapsed()
    );
    Ok(Json(PoliciesResponse { policies }))
}
