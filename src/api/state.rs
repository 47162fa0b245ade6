//! Application state for shared services

use std::sync::Arc;

use crate::domain::PrincipalId;
use crate::infrastructure::api_key::ApiKeyService;
use crate::infrastructure::metrics::PrometheusMetrics;
use crate::infrastructure::terminal_alias::TerminalAliasService;

/// Credentials of the admin API
#[derive(Debug, Clone)]
pub struct AdminAccess {
    /// Admin API is disabled when unset
    pub token: Option<String>,
    /// Principal recorded as the author of admin changes
    pub principal: PrincipalId,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub api_key_service: Arc<ApiKeyService>,
    pub terminal_alias_service: Arc<TerminalAliasService>,
    pub admin: AdminAccess,
    pub metrics: Option<PrometheusMetrics>,
}
