//! JSON-RPC 2.0 envelopes

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::DomainError;

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;
pub const MISSING_CREDENTIAL: i64 = -32001;
pub const ACCESS_DENIED: i64 = -32003;
pub const NOT_FOUND: i64 = -32004;

/// Inbound call. Only `params` and `id` are interpreted; the route selects the
/// procedure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl JsonRpcRequest {
    /// String parameter by name
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
    pub id: Value,
}

/// A response envelope paired with its HTTP status
#[derive(Debug)]
pub struct JsonRpcReply {
    status: StatusCode,
    body: JsonRpcResponse,
}

impl JsonRpcReply {
    pub fn result(id: Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(value) => Self {
                status: StatusCode::OK,
                body: JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    result: Some(value),
                    error: None,
                    id,
                },
            },
            Err(e) => RpcError::Internal(format!("Failed to encode result: {}", e)).reply(id),
        }
    }

    pub fn error(id: Value, status: StatusCode, code: i64, message: impl Into<String>) -> Self {
        Self {
            status,
            body: JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                result: None,
                error: Some(JsonRpcErrorObject {
                    code,
                    message: message.into(),
                }),
                id,
            },
        }
    }

    pub fn from_result<T: Serialize>(id: Value, result: Result<T, RpcError>) -> Self {
        match result {
            Ok(value) => Self::result(id, value),
            Err(err) => err.reply(id),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &JsonRpcResponse {
        &self.body
    }
}

impl IntoResponse for JsonRpcReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Failures raised by procedures
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RpcError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParams(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::NotFound(_) => NOT_FOUND,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    pub fn reply(self, id: Value) -> JsonRpcReply {
        JsonRpcReply::error(id, self.status(), self.code(), self.to_string())
    }
}

impl From<DomainError> for RpcError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::NotFound(message),
            DomainError::Validation { message } => Self::InvalidParams(message),
            other => {
                tracing::error!(error = %other, "Procedure failed");
                Self::Internal("Server error".to_string())
            }
        }
    }
}

/// Extractor for a JSON-RPC call; malformed bodies answer with a parse error
#[derive(Debug, Clone)]
pub struct JsonRpc(pub JsonRpcRequest);

impl<S> FromRequest<S> for JsonRpc
where
    S: Send + Sync,
{
    type Rejection = JsonRpcReply;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            JsonRpcReply::error(Value::Null, StatusCode::BAD_REQUEST, PARSE_ERROR, e.body_text())
        })?;

        if bytes.is_empty() {
            return Ok(JsonRpc(JsonRpcRequest::default()));
        }

        serde_json::from_slice(&bytes).map(JsonRpc).map_err(|e| {
            JsonRpcReply::error(
                Value::Null,
                StatusCode::BAD_REQUEST,
                PARSE_ERROR,
                format!("Parse error: {}", e),
            )
        })
    }
}
