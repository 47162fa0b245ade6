//! Terminal alias procedures

use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{JsonRpc, JsonRpcReply, JsonRpcRequest, RpcError};
use crate::domain::TerminalAlias;

#[derive(Debug, Serialize)]
pub struct AliasView {
    pub name: String,
    pub command: String,
}

impl From<&TerminalAlias> for AliasView {
    fn from(alias: &TerminalAlias) -> Self {
        Self {
            name: alias.name().to_string(),
            command: alias.command().to_string(),
        }
    }
}

pub async fn aliases(State(state): State<AppState>, JsonRpc(call): JsonRpc) -> JsonRpcReply {
    let result = state
        .terminal_alias_service
        .list()
        .await
        .map(|aliases| aliases.iter().map(AliasView::from).collect::<Vec<_>>())
        .map_err(RpcError::from);

    JsonRpcReply::from_result(call.id, result)
}

pub async fn alias(State(state): State<AppState>, JsonRpc(call): JsonRpc) -> JsonRpcReply {
    let result = lookup(&state, &call).await;
    JsonRpcReply::from_result(call.id, result)
}

async fn lookup(state: &AppState, call: &JsonRpcRequest) -> Result<AliasView, RpcError> {
    let name = call
        .param_str("name")
        .ok_or_else(|| RpcError::InvalidParams("'name' must be a string".to_string()))?;

    state
        .terminal_alias_service
        .get_by_name(name)
        .await?
        .map(|alias| AliasView::from(&alias))
        .ok_or_else(|| RpcError::NotFound(format!("Alias '{}' not found", name)))
}
