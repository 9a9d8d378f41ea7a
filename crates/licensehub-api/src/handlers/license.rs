//! License handlers.
//!
//! `create` and `verify` are called by licensed installations and carry no
//! token; everything else is administrative.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::info;

use licensehub_core::types::pagination::PageResponse;
use licensehub_core::types::response::ApiEnvelope;
use licensehub_entity::license::SignedLicense;

use super::ApiResult;
use crate::dto::request::{BindRequest, ContainerQuery, SealedRequest, SetStatusRequest};
use crate::dto::response::LicenseView;
use crate::extractors::{AuthUser, ListQuery, ValidJson, ValidQuery};
use crate::state::AppState;

/// POST /license/create
pub async fn create(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SealedRequest>,
) -> ApiResult<SignedLicense> {
    let signed = state.licenses.create(&req.into(), Utc::now()).await?;
    Ok(Json(ApiEnvelope::ok(signed)))
}

/// POST /license/verify
pub async fn verify(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<SealedRequest>,
) -> ApiResult<SignedLicense> {
    let signed = state.licenses.verify(&req.into(), Utc::now()).await?;
    Ok(Json(ApiEnvelope::ok(signed)))
}

/// GET /license/list?page&size&name
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidQuery(query): ValidQuery<ListQuery>,
) -> ApiResult<PageResponse<LicenseView>> {
    let page = query.page_request(state.config.license.default_page_size);
    let licenses = state.licenses.list(query.name.as_deref(), &page).await?;
    Ok(Json(ApiEnvelope::ok(licenses.map(LicenseView::from))))
}

/// GET /license/getInfo?id=<containerId>
pub async fn get_info(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidQuery(query): ValidQuery<ContainerQuery>,
) -> ApiResult<LicenseView> {
    let license = state.licenses.get(&query.id).await?;
    Ok(Json(ApiEnvelope::ok(license.into())))
}

/// POST /license/status
pub async fn set_status(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<SetStatusRequest>,
) -> ApiResult<LicenseView> {
    let license = state
        .licenses
        .set_status(&req.container_id, req.status)
        .await?;
    info!(actor = %auth.username, container_id = %req.container_id, status = %req.status, "Admin set license status");
    Ok(Json(ApiEnvelope::ok(license.into())))
}

/// POST /license/bind
pub async fn bind(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<BindRequest>,
) -> ApiResult<LicenseView> {
    let license = state
        .licenses
        .bind(&req.container_id, &req.ip, &req.domain, req.expire)
        .await?;
    info!(actor = %auth.username, container_id = %req.container_id, "Admin updated license binding");
    Ok(Json(ApiEnvelope::ok(license.into())))
}

/// GET /license/remove?id=<containerId>
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ContainerQuery>,
) -> ApiResult<()> {
    state.licenses.remove(&query.id).await?;
    info!(actor = %auth.username, container_id = %query.id, "Admin removed license");
    Ok(Json(ApiEnvelope::empty()))
}
