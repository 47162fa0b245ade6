//! Gate middleware

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{header::CONTENT_LENGTH, request::Parts, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, error, info};

use crate::domain::DomainError;
use crate::infrastructure::api_key::Resolution;
use crate::infrastructure::metrics::record_gate_outcome;

use super::context::CallerContext;
use super::error::GateError;
use super::gate::KeyGate;
use super::routes::Enforcement;

/// Wraps dispatch of every declared route
pub async fn key_gate(State(gate): State<Arc<KeyGate>>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    match gate.enforcement(&path) {
        Ok(Enforcement::Open) => {
            record_gate_outcome("bypassed");

            let mut request = request;
            request.extensions_mut().insert(CallerContext::anonymous());
            return next.run(request).await;
        }
        Ok(Enforcement::KeyRequired) => {}
        Err(err) => return reject(err, Value::Null, &path),
    }

    let remote_addr = remote_addr(&request);
    let (parts, body) = request.into_parts();

    let (request, resolution) = match admit(&gate, parts, body).await {
        Ok(admitted) => admitted,
        Err((err, id)) => return reject(err, id, &path),
    };

    record_gate_outcome("authorized");
    debug!(key_id = %resolution.key.id(), path = %path, "Request authorized");

    let response = next.run(request).await;

    if response.status().is_success() {
        gate.meter(&resolution, &remote_addr, &path).await;
    }

    response
}

/// Check the credential of a JSON-RPC call and rebuild the request without it
async fn admit(
    gate: &KeyGate,
    mut parts: Parts,
    body: Body,
) -> Result<(Request, Resolution), (GateError, Value)> {
    let bytes = to_bytes(body, gate.max_body_bytes())
        .await
        .map_err(|e| {
            debug!(error = %e, "Unreadable request body");
            (GateError::MissingCredential, Value::Null)
        })?;

    let mut call: Value = serde_json::from_slice(&bytes)
        .map_err(|_| (GateError::MissingCredential, Value::Null))?;
    let id = call.get("id").cloned().unwrap_or(Value::Null);

    let secret = match take_credential(&mut call) {
        Ok(secret) => secret,
        Err(err) => return Err((err, id)),
    };

    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let resolution = match gate.authorize(&secret, &target).await {
        Ok(resolution) => resolution,
        Err(err) => return Err((err, id)),
    };

    let sanitized = match serde_json::to_vec(&call) {
        Ok(sanitized) => sanitized,
        Err(e) => {
            let err = DomainError::internal(format!("Failed to re-encode call: {}", e));
            return Err((GateError::Internal(err), id));
        }
    };

    parts
        .headers
        .insert(CONTENT_LENGTH, HeaderValue::from(sanitized.len()));
    parts
        .extensions
        .insert(CallerContext::from_resolution(&resolution));

    Ok((Request::from_parts(parts, Body::from(sanitized)), resolution))
}

/// Remove `params.key` from a call
fn take_credential(call: &mut Value) -> Result<String, GateError> {
    let params = call
        .get_mut("params")
        .and_then(Value::as_object_mut)
        .ok_or(GateError::MissingCredential)?;

    match params.remove("key") {
        Some(Value::String(secret)) if !secret.is_empty() => Ok(secret),
        _ => Err(GateError::MissingCredential),
    }
}

fn remote_addr(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn reject(err: GateError, id: Value, path: &str) -> Response {
    record_gate_outcome(err.outcome());

    match &err {
        GateError::Internal(cause) => error!(path = %path, error = %cause, "Key lookup failed"),
        GateError::ProtocolMismatch => info!(path = %path, "Key required on a non JSON-RPC route"),
        other => debug!(path = %path, reason = %other, "Request rejected"),
    }

    err.into_reply(id).into_response()
}
