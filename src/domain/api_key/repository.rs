//! API key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKey, ApiKeyId, RouteId};
use crate::domain::DomainError;

/// Repository trait for API key storage
///
/// Usage counters belong to [`ApiKeyRepository::record_usage`]; `update` persists
/// administrative fields only and never overwrites the stored counters.
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// Get an API key by its ID
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError>;

    /// Get the active key holding the given secret
    async fn find_active_by_secret(&self, secret: &str) -> Result<Option<ApiKey>, DomainError>;

    /// Create a new API key. Fails with a conflict when the secret is taken.
    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError>;

    /// Update an existing API key and its route list
    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError>;

    /// Delete an API key together with its routes
    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError>;

    /// List all API keys, oldest first
    async fn list(&self) -> Result<Vec<ApiKey>, DomainError>;

    /// Check if an API key ID exists
    async fn exists(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        Ok(self.get(id).await?.is_some())
    }

    /// Increment the key's usage counter, and the route's when one matched
    async fn record_usage(
        &self,
        id: &ApiKeyId,
        route_id: Option<&RouteId>,
    ) -> Result<(), DomainError>;
}
