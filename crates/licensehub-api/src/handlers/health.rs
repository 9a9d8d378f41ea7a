//! Health check handler.

use axum::Json;
use axum::extract::State;

use licensehub_core::traits::CacheProvider;
use licensehub_core::types::response::ApiEnvelope;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Always answers 200; a failing dependency only flips `status`.
pub async fn health(State(state): State<AppState>) -> Json<ApiEnvelope<HealthResponse>> {
    let database = state.stores.licenses.health_check().await.unwrap_or(false);
    let cache = state.cache.health_check().await.unwrap_or(false);

    Json(ApiEnvelope::ok(HealthResponse {
        status: if database && cache { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        cache,
    }))
}
