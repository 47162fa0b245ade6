//! Authorization and usage accounting for key-protected routes

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{ApiKeyRepository, AuditEntry, AuditSink};
use crate::infrastructure::api_key::{KeyStore, Resolution};

use super::error::GateError;
use super::routes::{Enforcement, RouteTable};

#[derive(Debug)]
pub struct KeyGate {
    routes: RouteTable,
    store: KeyStore,
    repository: Arc<dyn ApiKeyRepository>,
    audit: Arc<dyn AuditSink>,
    max_body_bytes: usize,
}

impl KeyGate {
    pub fn new(
        routes: RouteTable,
        repository: Arc<dyn ApiKeyRepository>,
        audit: Arc<dyn AuditSink>,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            routes,
            store: KeyStore::new(repository.clone()),
            repository,
            audit,
            max_body_bytes,
        }
    }

    pub fn enforcement(&self, path: &str) -> Result<Enforcement, GateError> {
        self.routes.enforcement(path)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Resolve a presented secret for a request path (query string allowed)
    pub async fn authorize(&self, secret: &str, path: &str) -> Result<Resolution, GateError> {
        self.store
            .resolve(secret, path)
            .await?
            .ok_or(GateError::AccessDenied)
    }

    /// Count a successful call and note it in the key's audit trail.
    /// Failures are logged and never reach the caller.
    pub async fn meter(&self, resolution: &Resolution, remote_addr: &str, path: &str) {
        let key = &resolution.key;
        let route_id = resolution.route.as_ref().map(|r| r.id());

        if let Err(e) = self.repository.record_usage(key.id(), route_id).await {
            warn!(key_id = %key.id(), error = %e, "Failed to record key usage");
        }

        let entry = AuditEntry::key_used(*key.id(), key.owner().clone(), remote_addr, path);

        match self.audit.post(entry).await {
            Ok(()) => debug!(key_id = %key.id(), path = %path, "Key usage metered"),
            Err(e) => warn!(key_id = %key.id(), error = %e, "Failed to append key usage note"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::MockAuditSink;
    use crate::domain::{ApiKey, DomainError, PrincipalId};
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;
    use crate::infrastructure::audit::InMemoryAuditSink;

    async fn gate_with(
        key: ApiKey,
        audit: Arc<dyn AuditSink>,
    ) -> (KeyGate, Arc<InMemoryApiKeyRepository>) {
        let repo = Arc::new(InMemoryApiKeyRepository::new());
        repo.create(key).await.unwrap();

        (
            KeyGate::new(RouteTable::new(), repo.clone(), audit, 1024),
            repo,
        )
    }

    fn restricted_key() -> ApiKey {
        ApiKey::new("s3cret", PrincipalId::new("demo").unwrap())
            .unwrap()
            .with_routes(&["/api/foo"])
            .unwrap()
    }

    #[tokio::test]
    async fn test_authorize_denies_unmatched_route() {
        let (gate, _) = gate_with(restricted_key(), Arc::new(InMemoryAuditSink::new())).await;

        assert!(matches!(
            gate.authorize("s3cret", "/api/bar").await,
            Err(GateError::AccessDenied)
        ));
        assert!(matches!(
            gate.authorize("wrong", "/api/foo").await,
            Err(GateError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn test_meter_counts_route_and_key() {
        let audit = Arc::new(InMemoryAuditSink::new());
        let key = restricted_key();
        let id = *key.id();
        let (gate, repo) = gate_with(key, audit.clone()).await;

        let resolution = gate.authorize("s3cret", "/API/foo?x=1").await.unwrap();
        gate.meter(&resolution, "10.0.0.1", "/API/foo").await;

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.use_count(), 1);
        assert_eq!(stored.allowed_routes()[0].use_count(), 1);

        let trail = audit.list_for_key(&id).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].body(), "10.0.0.1 used this key in '/API/foo'");
        assert_eq!(trail[0].author().as_str(), "demo");
    }

    #[tokio::test]
    async fn test_meter_swallows_audit_failures() {
        let mut audit = MockAuditSink::new();
        audit
            .expect_post()
            .times(1)
            .returning(|_| Err(DomainError::storage("audit table missing")));

        let key = ApiKey::new("s3cret", PrincipalId::new("demo").unwrap()).unwrap();
        let id = *key.id();
        let (gate, repo) = gate_with(key, Arc::new(audit)).await;

        let resolution = gate.authorize("s3cret", "/anything").await.unwrap();
        gate.meter(&resolution, "unknown", "/anything").await;

        assert_eq!(repo.get(&id).await.unwrap().unwrap().use_count(), 1);
    }
}
