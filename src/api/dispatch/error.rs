//! Gate failures

use axum::http::StatusCode;
use serde_json::Value;

use crate::api::types::jsonrpc::{
    JsonRpcReply, ACCESS_DENIED, INTERNAL_ERROR, INVALID_REQUEST, MISSING_CREDENTIAL,
};
use crate::domain::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A key is required on a route that cannot carry one
    #[error("This route requires an API key but is not a JSON-RPC route")]
    ProtocolMismatch,

    #[error("Missing API key")]
    MissingCredential,

    #[error("Access denied")]
    AccessDenied,

    #[error("Key lookup failed: {0}")]
    Internal(#[from] DomainError),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProtocolMismatch => StatusCode::BAD_REQUEST,
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::AccessDenied => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::ProtocolMismatch => INVALID_REQUEST,
            Self::MissingCredential => MISSING_CREDENTIAL,
            Self::AccessDenied => ACCESS_DENIED,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }

    /// Label of the `jsonrpc_key_gate_requests_total` counter
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ProtocolMismatch => "protocol_mismatch",
            Self::MissingCredential => "missing_credential",
            Self::AccessDenied => "access_denied",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn into_reply(self, id: Value) -> JsonRpcReply {
        let message = match &self {
            Self::Internal(_) => "Server error".to_string(),
            other => other.to_string(),
        };

        JsonRpcReply::error(id, self.status(), self.code(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_and_codes() {
        assert_eq!(GateError::ProtocolMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(GateError::MissingCredential.code(), -32001);
        assert_eq!(GateError::AccessDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GateError::from(DomainError::storage("down")).code(),
            INTERNAL_ERROR
        );
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(GateError::ProtocolMismatch.outcome(), "protocol_mismatch");
        assert_eq!(GateError::MissingCredential.outcome(), "missing_credential");
        assert_eq!(GateError::AccessDenied.outcome(), "access_denied");
        assert_eq!(
            GateError::from(DomainError::storage("down")).outcome(),
            "internal_error"
        );
    }

    #[test]
    fn test_reply_hides_internal_details() {
        let reply = GateError::from(DomainError::storage("db password wrong")).into_reply(json!(1));
        let body = serde_json::to_value(reply.body()).unwrap();

        assert_eq!(body["error"]["message"], "Server error");
        assert_eq!(body["id"], 1);
    }
}
