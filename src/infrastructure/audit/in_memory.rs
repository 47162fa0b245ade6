//! In-memory audit sink

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::api_key::ApiKeyId;
use crate::domain::audit::{AuditEntry, AuditSink};
use crate::domain::DomainError;

/// Keeps entries in insertion order
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn post(&self, entry: AuditEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn list_for_key(&self, key_id: &ApiKeyId) -> Result<Vec<AuditEntry>, DomainError> {
        let entries = self.entries.read().await;

        Ok(entries
            .iter()
            .filter(|e| e.key_id() == key_id)
            .cloned()
            .collect())
    }

    async fn purge_key(&self, key_id: &ApiKeyId) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|e| e.key_id() != key_id);
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrincipalId;

    fn entry(key_id: ApiKeyId, body: &str) -> AuditEntry {
        AuditEntry::new(key_id, PrincipalId::new("demo").unwrap(), body)
    }

    #[tokio::test]
    async fn test_list_for_key_filters_and_keeps_order() {
        let sink = InMemoryAuditSink::new();
        let a = ApiKeyId::generate();
        let b = ApiKeyId::generate();

        sink.post(entry(a, "first")).await.unwrap();
        sink.post(entry(b, "other")).await.unwrap();
        sink.post(entry(a, "second")).await.unwrap();

        let bodies: Vec<String> = sink
            .list_for_key(&a)
            .await
            .unwrap()
            .iter()
            .map(|e| e.body().to_string())
            .collect();

        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_purge_key() {
        let sink = InMemoryAuditSink::new();
        let a = ApiKeyId::generate();
        let b = ApiKeyId::generate();

        sink.post(entry(a, "one")).await.unwrap();
        sink.post(entry(a, "two")).await.unwrap();
        sink.post(entry(b, "kept")).await.unwrap();

        assert_eq!(sink.purge_key(&a).await.unwrap(), 2);
        assert!(sink.list_for_key(&a).await.unwrap().is_empty());
        assert_eq!(sink.list_for_key(&b).await.unwrap().len(), 1);
    }
}
