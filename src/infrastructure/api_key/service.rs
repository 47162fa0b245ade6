//! API Key service
//!
//! Administrative operations on keys. Every change to a tracked field leaves a
//! note in the key's audit trail, attributed to the acting principal.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::api_key::{ApiKey, ApiKeyId, ApiKeyRepository};
use crate::domain::audit::{AuditEntry, AuditSink};
use crate::domain::{DomainError, PrincipalId};

use super::generator::SecretGenerator;

/// Input for creating a key
#[derive(Debug, Clone)]
pub struct CreateApiKey {
    pub owner: PrincipalId,
    pub routes: Vec<String>,
    /// Generated when absent
    pub secret: Option<String>,
}

/// Partial update of a key's administrative fields
#[derive(Debug, Clone, Default)]
pub struct UpdateApiKey {
    pub owner: Option<PrincipalId>,
    pub active: Option<bool>,
    pub routes: Option<Vec<String>>,
}

/// API Key service for managing API keys
#[derive(Debug, Clone)]
pub struct ApiKeyService {
    repository: Arc<dyn ApiKeyRepository>,
    audit: Arc<dyn AuditSink>,
    generator: SecretGenerator,
}

impl ApiKeyService {
    pub fn new(repository: Arc<dyn ApiKeyRepository>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            repository,
            audit,
            generator: SecretGenerator::new(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: SecretGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Create a new API key
    pub async fn create(
        &self,
        request: CreateApiKey,
        actor: &PrincipalId,
    ) -> Result<ApiKey, DomainError> {
        let secret = request
            .secret
            .unwrap_or_else(|| self.generator.generate());

        let api_key = ApiKey::new(secret, request.owner)?.with_routes(&request.routes)?;
        let created = self.repository.create(api_key).await?;

        info!(key_id = %created.id(), owner = %created.owner(), actor = %actor, "API key created");

        self.track(
            &created,
            actor,
            format!(
                "Key created for {} ({})",
                created.owner(),
                describe_routes(&created)
            ),
        )
        .await;

        Ok(created)
    }

    /// Get an API key by ID
    pub async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        self.repository.get(id).await
    }

    /// List all API keys
    pub async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        self.repository.list().await
    }

    /// Apply an update, noting each changed field in the audit trail
    pub async fn update(
        &self,
        id: &ApiKeyId,
        changes: UpdateApiKey,
        actor: &PrincipalId,
    ) -> Result<ApiKey, DomainError> {
        let mut key = self.require(id).await?;
        let mut notes = Vec::new();

        if let Some(owner) = changes.owner {
            if &owner != key.owner() {
                notes.push(format!("Owner: {} -> {}", key.owner(), owner));
                key.set_owner(owner);
            }
        }

        if let Some(active) = changes.active {
            if active != key.is_active() {
                notes.push(format!("Active: {} -> {}", key.is_active(), active));

                if active {
                    key.activate();
                } else {
                    key.deactivate();
                }
            }
        }

        if let Some(routes) = changes.routes {
            let before = describe_routes(&key);
            key.replace_routes(&routes)?;
            let after = describe_routes(&key);

            if before != after {
                notes.push(format!("Allowed routes: {} -> {}", before, after));
            }
        }

        if notes.is_empty() {
            return Ok(key);
        }

        let updated = self.repository.update(&key).await?;

        info!(key_id = %id, actor = %actor, changes = notes.len(), "API key updated");

        for note in notes {
            self.track(&updated, actor, note).await;
        }

        Ok(updated)
    }

    /// Activate or deactivate a key
    pub async fn set_active(
        &self,
        id: &ApiKeyId,
        active: bool,
        actor: &PrincipalId,
    ) -> Result<ApiKey, DomainError> {
        self.update(
            id,
            UpdateApiKey {
                active: Some(active),
                ..Default::default()
            },
            actor,
        )
        .await
    }

    /// Replace the secret with a freshly generated one
    pub async fn regenerate_secret(
        &self,
        id: &ApiKeyId,
        actor: &PrincipalId,
    ) -> Result<ApiKey, DomainError> {
        let mut key = self.require(id).await?;
        key.set_secret(self.generator.generate())?;

        let updated = self.repository.update(&key).await?;

        info!(key_id = %id, actor = %actor, "API key secret regenerated");
        self.track(&updated, actor, "Secret regenerated".to_string())
            .await;

        Ok(updated)
    }

    /// Delete a key with its routes and audit trail
    pub async fn delete(&self, id: &ApiKeyId, actor: &PrincipalId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;

        if deleted {
            match self.audit.purge_key(id).await {
                Ok(purged) => {
                    info!(key_id = %id, actor = %actor, purged_notes = purged, "API key deleted")
                }
                Err(e) => {
                    warn!(key_id = %id, actor = %actor, error = %e, "API key deleted, audit trail kept")
                }
            }
        }

        Ok(deleted)
    }

    /// Audit trail of a key, oldest first
    pub async fn audit_trail(&self, id: &ApiKeyId) -> Result<Vec<AuditEntry>, DomainError> {
        self.require(id).await?;
        self.audit.list_for_key(id).await
    }

    async fn require(&self, id: &ApiKeyId) -> Result<ApiKey, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))
    }

    /// Post a tracking note. The change is already stored, so a failed note
    /// is logged and never fails the operation.
    async fn track(&self, key: &ApiKey, actor: &PrincipalId, body: String) {
        if let Err(e) = self
            .audit
            .post(AuditEntry::new(*key.id(), actor.clone(), body))
            .await
        {
            warn!(key_id = %key.id(), actor = %actor, error = %e, "Failed to post tracking note");
        }
    }
}

fn describe_routes(key: &ApiKey) -> String {
    if key.allowed_routes().is_empty() {
        return "any route".to_string();
    }

    key.allowed_routes()
        .iter()
        .map(|r| r.pattern())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audit::MockAuditSink;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;
    use crate::infrastructure::audit::InMemoryAuditSink;

    fn admin() -> PrincipalId {
        PrincipalId::new("admin").unwrap()
    }

    fn service() -> (ApiKeyService, Arc<InMemoryAuditSink>) {
        let audit = Arc::new(InMemoryAuditSink::new());
        let service = ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()), audit.clone());
        (service, audit)
    }

    fn request(routes: &[&str]) -> CreateApiKey {
        CreateApiKey {
            owner: PrincipalId::new("demo").unwrap(),
            routes: routes.iter().map(|r| r.to_string()).collect(),
            secret: None,
        }
    }

    #[tokio::test]
    async fn test_create_generates_secret() {
        let (service, audit) = service();

        let key = service.create(request(&[]), &admin()).await.unwrap();

        assert_eq!(key.secret().len(), 64);
        assert!(key.is_active());

        let trail = audit.list_for_key(key.id()).await.unwrap();
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].body(), "Key created for demo (any route)");
        assert_eq!(trail[0].author().as_str(), "admin");
    }

    #[tokio::test]
    async fn test_create_with_duplicate_secret_conflicts() {
        let (service, _) = service();
        let mut first = request(&[]);
        first.secret = Some("fixed".to_string());
        service.create(first.clone(), &admin()).await.unwrap();

        let result = service.create(first, &admin()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_routes() {
        let (service, _) = service();
        let result = service.create(request(&["no-slash"]), &admin()).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_tracks_changed_fields() {
        let (service, audit) = service();
        let key = service.create(request(&["/a"]), &admin()).await.unwrap();

        let updated = service
            .update(
                key.id(),
                UpdateApiKey {
                    owner: Some(PrincipalId::new("other").unwrap()),
                    active: Some(false),
                    routes: Some(vec!["/a".to_string(), "/b".to_string()]),
                },
                &admin(),
            )
            .await
            .unwrap();

        assert_eq!(updated.owner().as_str(), "other");
        assert!(!updated.is_active());
        assert_eq!(updated.allowed_routes().len(), 2);

        let bodies: Vec<String> = audit
            .list_for_key(key.id())
            .await
            .unwrap()
            .iter()
            .map(|e| e.body().to_string())
            .collect();

        assert_eq!(
            bodies,
            vec![
                "Key created for demo (/a)".to_string(),
                "Owner: demo -> other".to_string(),
                "Active: true -> false".to_string(),
                "Allowed routes: /a -> /a, /b".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_without_changes_posts_nothing() {
        // Only the creation note is expected
        let mut audit = MockAuditSink::new();
        audit.expect_post().times(1).returning(|_| Ok(()));

        let service = ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()), Arc::new(audit));
        let key = service.create(request(&[]), &admin()).await.unwrap();

        service
            .update(
                key.id(),
                UpdateApiKey {
                    active: Some(true),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_regenerate_secret() {
        let (service, audit) = service();
        let key = service.create(request(&[]), &admin()).await.unwrap();

        let regenerated = service.regenerate_secret(key.id(), &admin()).await.unwrap();

        assert_ne!(regenerated.secret(), key.secret());
        assert_eq!(regenerated.secret().len(), 64);

        let trail = audit.list_for_key(key.id()).await.unwrap();
        let last = trail.last().unwrap();
        assert_eq!(last.body(), "Secret regenerated");
        assert!(!last.body().contains(regenerated.secret()));
    }

    #[tokio::test]
    async fn test_regenerate_secret_survives_audit_failure() {
        let mut audit = MockAuditSink::new();
        audit
            .expect_post()
            .returning(|_| Err(DomainError::storage("audit table missing")));

        let repository = Arc::new(InMemoryApiKeyRepository::new());
        let service = ApiKeyService::new(repository.clone(), Arc::new(audit));

        let key = service.create(request(&[]), &admin()).await.unwrap();
        let regenerated = service.regenerate_secret(key.id(), &admin()).await.unwrap();

        assert_ne!(regenerated.secret(), key.secret());

        let stored = repository
            .find_active_by_secret(regenerated.secret())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id(), key.id());
    }

    #[tokio::test]
    async fn test_update_survives_audit_failure() {
        let mut audit = MockAuditSink::new();
        audit
            .expect_post()
            .returning(|_| Err(DomainError::storage("audit table missing")));

        let service = ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()), Arc::new(audit));
        let key = service.create(request(&[]), &admin()).await.unwrap();

        let updated = service.set_active(key.id(), false, &admin()).await.unwrap();
        assert!(!updated.is_active());
    }

    #[tokio::test]
    async fn test_delete_survives_purge_failure() {
        let mut audit = MockAuditSink::new();
        audit.expect_post().returning(|_| Ok(()));
        audit
            .expect_purge_key()
            .times(1)
            .returning(|_| Err(DomainError::storage("audit table missing")));

        let service = ApiKeyService::new(Arc::new(InMemoryApiKeyRepository::new()), Arc::new(audit));
        let key = service.create(request(&[]), &admin()).await.unwrap();

        assert!(service.delete(key.id(), &admin()).await.unwrap());
        assert!(service.get(key.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let (service, _) = service();
        let key = service.create(request(&[]), &admin()).await.unwrap();

        let key = service.set_active(key.id(), false, &admin()).await.unwrap();
        assert!(!key.is_active());

        let key = service.set_active(key.id(), true, &admin()).await.unwrap();
        assert!(key.is_active());
    }

    #[tokio::test]
    async fn test_delete_purges_audit_trail() {
        let (service, audit) = service();
        let key = service.create(request(&["/a"]), &admin()).await.unwrap();

        assert!(service.delete(key.id(), &admin()).await.unwrap());
        assert!(service.get(key.id()).await.unwrap().is_none());
        assert!(audit.list_for_key(key.id()).await.unwrap().is_empty());
        assert!(!service.delete(key.id(), &admin()).await.unwrap());
    }

    #[tokio::test]
    async fn test_audit_trail_of_missing_key() {
        let (service, _) = service();
        let result = service.audit_trail(&ApiKeyId::generate()).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
