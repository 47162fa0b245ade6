//! Terminal alias admin endpoints

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
use crate::domain::{DomainError, TerminalAlias, TerminalAliasId};
use crate::infrastructure::terminal_alias::UpdateTerminalAlias;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTerminalAliasRequest {
    pub name: String,
    pub command: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTerminalAliasRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TerminalAliasResponse {
    pub id: String,
    pub name: String,
    pub command: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&TerminalAlias> for TerminalAliasResponse {
    fn from(alias: &TerminalAlias) -> Self {
        Self {
            id: alias.id().to_string(),
            name: alias.name().to_string(),
            command: alias.command().to_string(),
            created_at: alias.created_at().to_rfc3339(),
            updated_at: alias.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTerminalAliasesResponse {
    pub aliases: Vec<TerminalAliasResponse>,
    pub total: usize,
}

fn parse_alias_id(alias_id: &str) -> Result<TerminalAliasId, ApiError> {
    TerminalAliasId::parse(alias_id).map_err(|e| ApiError::from(DomainError::from(e)))
}

/// GET /admin/terminal-aliases
pub async fn list_terminal_aliases(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<ListTerminalAliasesResponse>, ApiError> {
    let aliases: Vec<TerminalAliasResponse> = state
        .terminal_alias_service
        .list()
        .await?
        .iter()
        .map(TerminalAliasResponse::from)
        .collect();
    let total = aliases.len();

    Ok(Json(ListTerminalAliasesResponse { aliases, total }))
}

/// POST /admin/terminal-aliases
pub async fn create_terminal_alias(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    payload: Result<Json<CreateTerminalAliasRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TerminalAliasResponse>), ApiError> {
    let Json(request) = payload?;
    debug!(name = %request.name, "Admin creating terminal alias");

    let alias = state
        .terminal_alias_service
        .create(request.name, request.command)
        .await?;

    Ok((StatusCode::CREATED, Json(TerminalAliasResponse::from(&alias))))
}

/// GET /admin/terminal-aliases/{alias_id}
pub async fn get_terminal_alias(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(alias_id): Path<String>,
) -> Result<Json<TerminalAliasResponse>, ApiError> {
    let id = parse_alias_id(&alias_id)?;

    let alias = state
        .terminal_alias_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Alias '{}' not found", id)))?;

    Ok(Json(TerminalAliasResponse::from(&alias)))
}

/// PUT /admin/terminal-aliases/{alias_id}
pub async fn update_terminal_alias(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(alias_id): Path<String>,
    payload: Result<Json<UpdateTerminalAliasRequest>, JsonRejection>,
) -> Result<Json<TerminalAliasResponse>, ApiError> {
    let id = parse_alias_id(&alias_id)?;
    let Json(request) = payload?;

    let alias = state
        .terminal_alias_service
        .update(
            &id,
            UpdateTerminalAlias {
                name: request.name,
                command: request.command,
            },
        )
        .await?;

    Ok(Json(TerminalAliasResponse::from(&alias)))
}

/// DELETE /admin/terminal-aliases/{alias_id}
pub async fn delete_terminal_alias(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(alias_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_alias_id(&alias_id)?;

    if state.terminal_alias_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("Alias '{}' not found", id)))
    }
}
