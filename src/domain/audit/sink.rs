//! Audit sink trait

use async_trait::async_trait;

use super::entity::AuditEntry;
use crate::domain::api_key::ApiKeyId;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Append-only store for audit entries
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    /// Append an entry
    async fn post(&self, entry: AuditEntry) -> Result<(), DomainError>;

    /// Entries for one key, oldest first
    async fn list_for_key(&self, key_id: &ApiKeyId) -> Result<Vec<AuditEntry>, DomainError>;

    /// Drop every entry of a deleted key, returning how many were removed
    async fn purge_key(&self, key_id: &ApiKeyId) -> Result<usize, DomainError>;
}
