//! API key management admin endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdmin;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::api_key::{AllowedRoute, ApiKey, ApiKeyId};
use crate::domain::{AuditEntry, DomainError, PrincipalId};
use crate::infrastructure::api_key::{CreateApiKey, UpdateApiKey};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApiKeyRequest {
    pub owner: PrincipalId,
    #[serde(default)]
    pub routes: Vec<String>,
    /// Generated when omitted
    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default)]
    pub owner: Option<PrincipalId>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub routes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllowedRouteResponse {
    pub id: String,
    pub pattern: String,
    pub use_count: u64,
}

impl From<&AllowedRoute> for AllowedRouteResponse {
    fn from(route: &AllowedRoute) -> Self {
        Self {
            id: route.id().to_string(),
            pattern: route.pattern().to_string(),
            use_count: route.use_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiKeyResponse {
    pub id: String,
    pub secret: String,
    pub owner: String,
    pub active: bool,
    pub use_count: u64,
    pub allowed_routes: Vec<AllowedRouteResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id().to_string(),
            secret: key.secret().to_string(),
            owner: key.owner().to_string(),
            active: key.is_active(),
            use_count: key.use_count(),
            allowed_routes: key
                .allowed_routes()
                .iter()
                .map(AllowedRouteResponse::from)
                .collect(),
            created_at: key.created_at().to_rfc3339(),
            updated_at: key.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListApiKeysResponse {
    pub api_keys: Vec<ApiKeyResponse>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntryResponse {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_at: String,
}

impl From<&AuditEntry> for AuditEntryResponse {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            author: entry.author().to_string(),
            body: entry.body().to_string(),
            created_at: entry.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditTrailResponse {
    pub key_id: String,
    pub entries: Vec<AuditEntryResponse>,
}

fn parse_key_id(key_id: &str) -> Result<ApiKeyId, ApiError> {
    ApiKeyId::parse(key_id).map_err(|e| ApiError::from(DomainError::from(e)))
}

fn not_found(key_id: &ApiKeyId) -> ApiError {
    ApiError::not_found(format!("API key '{}' not found", key_id))
}

/// GET /admin/api-keys
pub async fn list_api_keys(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ListApiKeysResponse>, ApiError> {
    let keys = state.api_key_service.list().await?;
    let api_keys: Vec<ApiKeyResponse> = keys.iter().map(ApiKeyResponse::from).collect();
    let total = api_keys.len();

    Ok(Json(ListApiKeysResponse { api_keys, total }))
}

/// POST /admin/api-keys
pub async fn create_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    payload: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiKeyResponse>), ApiError> {
    let Json(request) = payload?;
    debug!(owner = %request.owner, routes = request.routes.len(), "Admin creating API key");

    let created = state
        .api_key_service
        .create(
            CreateApiKey {
                owner: request.owner,
                routes: request.routes,
                secret: request.secret,
            },
            &actor,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiKeyResponse::from(&created))))
}

/// GET /admin/api-keys/{key_id}
pub async fn get_api_key(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;

    let key = state
        .api_key_service
        .get(&id)
        .await?
        .ok_or_else(|| not_found(&id))?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// PUT /admin/api-keys/{key_id}
pub async fn update_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(key_id): Path<String>,
    payload: Result<Json<UpdateApiKeyRequest>, JsonRejection>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    let Json(request) = payload?;
    debug!(key_id = %id, "Admin updating API key");

    let updated = state
        .api_key_service
        .update(
            &id,
            UpdateApiKey {
                owner: request.owner,
                active: request.active,
                routes: request.routes,
            },
            &actor,
        )
        .await?;

    Ok(Json(ApiKeyResponse::from(&updated)))
}

/// DELETE /admin/api-keys/{key_id}
pub async fn delete_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_key_id(&key_id)?;

    if state.api_key_service.delete(&id, &actor).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

/// POST /admin/api-keys/{key_id}/regenerate
pub async fn regenerate_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    let key = state.api_key_service.regenerate_secret(&id, &actor).await?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// POST /admin/api-keys/{key_id}/activate
pub async fn activate_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    let key = state.api_key_service.set_active(&id, true, &actor).await?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// POST /admin/api-keys/{key_id}/deactivate
pub async fn deactivate_api_key(
    State(state): State<AppState>,
    RequireAdmin(actor): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<ApiKeyResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    let key = state.api_key_service.set_active(&id, false, &actor).await?;

    Ok(Json(ApiKeyResponse::from(&key)))
}

/// GET /admin/api-keys/{key_id}/audit
pub async fn api_key_audit_trail(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(key_id): Path<String>,
) -> Result<Json<AuditTrailResponse>, ApiError> {
    let id = parse_key_id(&key_id)?;
    let entries = state.api_key_service.audit_trail(&id).await?;

    Ok(Json(AuditTrailResponse {
        key_id: id.to_string(),
        entries: entries.iter().map(AuditEntryResponse::from).collect(),
    }))
}
