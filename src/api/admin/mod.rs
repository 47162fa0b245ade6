//! Admin API endpoints

pub mod api_keys;
pub mod terminal_aliases;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // API key management
        .route(
            "/api-keys",
            get(api_keys::list_api_keys).post(api_keys::create_api_key),
        )
        .route(
            "/api-keys/{key_id}",
            get(api_keys::get_api_key)
                .put(api_keys::update_api_key)
                .delete(api_keys::delete_api_key),
        )
        .route(
            "/api-keys/{key_id}/regenerate",
            post(api_keys::regenerate_api_key),
        )
        .route("/api-keys/{key_id}/activate", post(api_keys::activate_api_key))
        .route(
            "/api-keys/{key_id}/deactivate",
            post(api_keys::deactivate_api_key),
        )
        .route("/api-keys/{key_id}/audit", get(api_keys::api_key_audit_trail))
        // Terminal aliases
        .route(
            "/terminal-aliases",
            get(terminal_aliases::list_terminal_aliases)
                .post(terminal_aliases::create_terminal_alias),
        )
        .route(
            "/terminal-aliases/{alias_id}",
            get(terminal_aliases::get_terminal_alias)
                .put(terminal_aliases::update_terminal_alias)
                .delete(terminal_aliases::delete_terminal_alias),
        )
}
