//! In-memory API key repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::api_key::{AllowedRoute, ApiKey, ApiKeyId, ApiKeyRepository, RouteId};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Inner {
    keys: HashMap<ApiKeyId, ApiKey>,
    secret_index: HashMap<String, ApiKeyId>,
}

/// In-memory implementation of ApiKeyRepository
#[derive(Debug, Default)]
pub struct InMemoryApiKeyRepository {
    inner: RwLock<Inner>,
}

impl InMemoryApiKeyRepository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        Self::default()
    }
}

/// Carry the stored counters over to an incoming copy of the key
fn with_stored_counters(incoming: &ApiKey, stored: &ApiKey) -> ApiKey {
    let routes = incoming
        .allowed_routes()
        .iter()
        .map(|route| {
            let use_count = stored
                .route(route.id())
                .map(AllowedRoute::use_count)
                .unwrap_or_else(|| route.use_count());
            AllowedRoute::from_storage(*route.id(), route.pattern().to_string(), use_count)
        })
        .collect();

    ApiKey::from_storage(
        *incoming.id(),
        incoming.secret().to_string(),
        incoming.owner().clone(),
        incoming.is_active(),
        stored.use_count(),
        routes,
        incoming.created_at(),
        incoming.updated_at(),
    )
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.keys.get(id).cloned())
    }

    async fn find_active_by_secret(&self, secret: &str) -> Result<Option<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        Ok(inner
            .secret_index
            .get(secret)
            .and_then(|id| inner.keys.get(id))
            .filter(|key| key.is_active())
            .cloned())
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.keys.contains_key(api_key.id()) {
            return Err(DomainError::conflict(format!(
                "API key with ID '{}' already exists",
                api_key.id()
            )));
        }

        if inner.secret_index.contains_key(api_key.secret()) {
            return Err(DomainError::conflict("API key secret must be unique"));
        }

        inner
            .secret_index
            .insert(api_key.secret().to_string(), *api_key.id());
        inner.keys.insert(*api_key.id(), api_key.clone());

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .keys
            .get(api_key.id())
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", api_key.id())))?;

        if stored.secret() != api_key.secret() {
            if inner.secret_index.contains_key(api_key.secret()) {
                return Err(DomainError::conflict("API key secret must be unique"));
            }

            inner.secret_index.remove(stored.secret());
            inner
                .secret_index
                .insert(api_key.secret().to_string(), *api_key.id());
        }

        let merged = with_stored_counters(api_key, &stored);
        inner.keys.insert(*merged.id(), merged.clone());

        Ok(merged)
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let mut inner = self.inner.write().await;

        match inner.keys.remove(id) {
            Some(key) => {
                inner.secret_index.remove(key.secret());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        let inner = self.inner.read().await;

        let mut keys: Vec<ApiKey> = inner.keys.values().cloned().collect();
        keys.sort_by_key(|k| k.created_at());

        Ok(keys)
    }

    async fn record_usage(
        &self,
        id: &ApiKeyId,
        route_id: Option<&RouteId>,
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;

        let key = inner
            .keys
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))?;

        key.record_usage(route_id);
        Ok(())
    }
}
