//! jsonrpc-keys
//!
//! API key gate for JSON-RPC dispatch:
//! - Keys owned by a principal, optionally restricted to a list of routes
//! - Usage counters and an audit trail per key
//! - Terminal alias records served over JSON-RPC

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tracing::info;

use crate::api::{AdminAccess, AppState};
use crate::config::SeedKey;
use crate::domain::{DomainError, PrincipalId};
use crate::infrastructure::api_key::{ApiKeyService, CreateApiKey};
use crate::infrastructure::metrics::PrometheusMetrics;
use crate::infrastructure::storage::{Repositories, StorageFactory};
use crate::infrastructure::terminal_alias::TerminalAliasService;

const DEFAULT_ADMIN_PRINCIPAL: &str = "admin";

/// Build the application state over a set of repositories
pub fn create_app_state(
    config: &AppConfig,
    repositories: &Repositories,
    metrics: Option<PrometheusMetrics>,
) -> anyhow::Result<AppState> {
    let principal = config
        .admin
        .principal
        .as_deref()
        .unwrap_or(DEFAULT_ADMIN_PRINCIPAL);
    let principal = PrincipalId::new(principal).context("Invalid admin.principal")?;

    if config.admin.token.is_none() {
        info!("No admin token configured, admin API disabled");
    }

    Ok(AppState {
        api_key_service: Arc::new(ApiKeyService::new(
            repositories.api_keys.clone(),
            repositories.audit.clone(),
        )),
        terminal_alias_service: Arc::new(TerminalAliasService::new(
            repositories.terminal_aliases.clone(),
        )),
        admin: AdminAccess {
            token: config.admin.token.clone(),
            principal,
        },
        metrics,
    })
}

/// Create the configured keys that are not stored yet
pub async fn seed_keys(
    service: &ApiKeyService,
    seeds: &[SeedKey],
    actor: &PrincipalId,
) -> anyhow::Result<usize> {
    let mut created = 0;

    for seed in seeds {
        let owner = PrincipalId::new(seed.owner.clone())
            .with_context(|| format!("Invalid owner '{}' in seed_keys", seed.owner))?;

        let request = CreateApiKey {
            owner,
            routes: seed.routes.clone(),
            secret: Some(seed.secret.clone()),
        };

        match service.create(request, actor).await {
            Ok(key) => {
                info!(key_id = %key.id(), owner = %key.owner(), "Seeded API key");
                created += 1;
            }
            Err(DomainError::Conflict { .. }) => {
                info!(owner = %seed.owner, "Seed key already present");
            }
            Err(e) => return Err(e).context("Failed to seed API key"),
        }
    }

    Ok(created)
}

/// Open storage, seed keys and build the router
pub async fn create_app(
    config: &AppConfig,
    metrics: Option<PrometheusMetrics>,
) -> anyhow::Result<Router> {
    let storage = config
        .storage
        .to_storage_config()
        .map_err(anyhow::Error::msg)?;

    let repositories = StorageFactory::create(&storage)
        .await
        .context("Failed to open storage")?;

    let state = create_app_state(config, &repositories, metrics)?;

    if !config.seed_keys.is_empty() {
        let seeded = seed_keys(
            &state.api_key_service,
            &config.seed_keys,
            &state.admin.principal,
        )
        .await?;
        info!(seeded, "Seed keys processed");
    }

    Ok(api::create_router(
        state,
        &repositories,
        config.gate.max_body_bytes,
    ))
}
