//! Key store: resolves a presented secret and request path to a key

use std::sync::Arc;

use tracing::debug;

use crate::domain::api_key::{AllowedRoute, ApiKey, ApiKeyRepository};
use crate::domain::DomainError;

/// An active key authorized for the requested path
#[derive(Debug, Clone)]
pub struct Resolution {
    pub key: ApiKey,
    /// The allowed route that matched, for restricted keys
    pub route: Option<AllowedRoute>,
}

/// Read-only lookup over the key repository
#[derive(Debug, Clone)]
pub struct KeyStore {
    repository: Arc<dyn ApiKeyRepository>,
}

impl KeyStore {
    pub fn new(repository: Arc<dyn ApiKeyRepository>) -> Self {
        Self { repository }
    }

    /// Resolve a secret for a request path.
    ///
    /// Returns `None` when the secret is empty, unknown or inactive, and when a
    /// restricted key has no allowed route matching the path. The path may carry
    /// a query string; it is ignored for matching. Never modifies counters.
    pub async fn resolve(&self, secret: &str, path: &str) -> Result<Option<Resolution>, DomainError> {
        if secret.is_empty() {
            return Ok(None);
        }

        let Some(key) = self.repository.find_active_by_secret(secret).await? else {
            debug!("No active key for presented secret");
            return Ok(None);
        };

        if !key.is_restricted() {
            return Ok(Some(Resolution { key, route: None }));
        }

        match key.route_for(path).cloned() {
            Some(route) => Ok(Some(Resolution {
                key,
                route: Some(route),
            })),
            None => {
                debug!(key_id = %key.id(), path = %path, "Key is not allowed on this route");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PrincipalId;
    use crate::infrastructure::api_key::InMemoryApiKeyRepository;

    async fn store_with(keys: Vec<ApiKey>) -> (KeyStore, Arc<InMemoryApiKeyRepository>) {
        let repo = Arc::new(InMemoryApiKeyRepository::new());

        for key in keys {
            repo.create(key).await.unwrap();
        }

        (KeyStore::new(repo.clone()), repo)
    }

    fn key(secret: &str) -> ApiKey {
        ApiKey::new(secret, PrincipalId::new("demo").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_empty_secret_resolves_to_none() {
        let (store, _) = store_with(vec![key("abc")]).await;
        assert!(store.resolve("", "/api/foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_secret_resolves_to_none() {
        let (store, _) = store_with(vec![key("abc")]).await;
        assert!(store.resolve("nope", "/api/foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_inactive_key_resolves_to_none() {
        let mut inactive = key("abc");
        inactive.deactivate();
        let (store, _) = store_with(vec![inactive]).await;

        assert!(store.resolve("abc", "/api/foo").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unrestricted_key_matches_any_path() {
        let (store, _) = store_with(vec![key("abc")]).await;

        let resolution = store.resolve("abc", "/anything?at=all").await.unwrap().unwrap();
        assert_eq!(resolution.key.secret(), "abc");
        assert!(resolution.route.is_none());
    }

    #[tokio::test]
    async fn test_restricted_key_matches_route_case_insensitively() {
        let restricted = key("abc").with_routes(&["/api/foo"]).unwrap();
        let (store, _) = store_with(vec![restricted]).await;

        let resolution = store.resolve("abc", "/API/Foo?x=1").await.unwrap().unwrap();
        assert_eq!(resolution.route.unwrap().pattern(), "/api/foo");
    }

    #[tokio::test]
    async fn test_restricted_key_denied_outside_routes() {
        let restricted = key("abc").with_routes(&["/api/foo"]).unwrap();
        let (store, _) = store_with(vec![restricted]).await;

        assert!(store.resolve("abc", "/api/bar").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_matching_route_wins() {
        let restricted = key("abc").with_routes(&["/api/other", "/api/foo"]).unwrap();
        let expected = *restricted.route_for("/api/foo").unwrap().id();
        let (store, _) = store_with(vec![restricted]).await;

        let resolution = store.resolve("abc", "/api/foo").await.unwrap().unwrap();
        assert_eq!(*resolution.route.unwrap().id(), expected);
    }

    #[tokio::test]
    async fn test_resolve_has_no_side_effects() {
        let restricted = key("abc").with_routes(&["/api/foo"]).unwrap();
        let id = *restricted.id();
        let (store, repo) = store_with(vec![restricted]).await;

        store.resolve("abc", "/api/foo").await.unwrap();
        store.resolve("abc", "/api/foo").await.unwrap();

        let stored = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.use_count(), 0);
        assert_eq!(stored.allowed_routes()[0].use_count(), 0);
    }
}
