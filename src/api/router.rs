use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::infrastructure::storage::Repositories;

use super::admin;
use super::dispatch::{key_gate, KeyGate, RouteDeclaration, Routes};
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::rpc;
use super::state::AppState;

/// Every route that goes through the dispatch gate
pub fn declared_routes() -> Routes<AppState> {
    Routes::new()
        // Probes
        .declare(RouteDeclaration::http("/health"), get(health::health_check))
        .declare(RouteDeclaration::http("/live"), get(health::live_check))
        .declare(RouteDeclaration::http("/ready"), get(health::ready_check))
        .declare(RouteDeclaration::http("/metrics"), get(health::metrics))
        .declare(
            RouteDeclaration::http("/status").requiring_key(),
            get(health::status_page),
        )
        // JSON-RPC procedures
        .declare(
            RouteDeclaration::jsonrpc("/jsonrpc/version"),
            post(rpc::version),
        )
        .declare(
            RouteDeclaration::jsonrpc("/jsonrpc/whoami").requiring_key(),
            post(rpc::whoami),
        )
        .declare(
            RouteDeclaration::jsonrpc("/jsonrpc/terminal/aliases").requiring_key(),
            post(rpc::aliases),
        )
        .declare(
            RouteDeclaration::jsonrpc("/jsonrpc/terminal/alias").requiring_key(),
            post(rpc::alias),
        )
}

/// Create the full router. Undeclared paths fall through to the gate, which
/// refuses them; the admin API sits outside the gate.
pub fn create_router(state: AppState, repositories: &Repositories, max_body_bytes: usize) -> Router {
    let (table, routes) = declared_routes().into_parts();

    let gate = Arc::new(KeyGate::new(
        table,
        repositories.api_keys.clone(),
        repositories.audit.clone(),
        max_body_bytes,
    ));

    routes
        .layer(middleware::from_fn_with_state(gate, key_gate))
        .nest("/admin", admin::create_admin_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}
