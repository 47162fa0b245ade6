//! API key entity and its allowed routes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_route_pattern, validate_route_patterns, validate_secret, ApiKeyValidationError,
};
use crate::domain::principal::PrincipalId;

/// API key identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(Uuid);

impl ApiKeyId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(value: &str) -> Result<Self, ApiKeyValidationError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ApiKeyValidationError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ApiKeyId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allowed route identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(Uuid);

impl RouteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, ApiKeyValidationError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| ApiKeyValidationError::InvalidRouteId(value.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for RouteId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip the query string and lower-case a request path for route matching
pub fn normalize_path(path: &str) -> String {
    let without_query = path.split_once('?').map_or(path, |(p, _)| p);
    without_query.to_lowercase()
}

/// A path a restricted key may be used on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedRoute {
    id: RouteId,
    /// Literal path, matched case-insensitively
    pattern: String,
    use_count: u64,
}

impl AllowedRoute {
    pub fn new(pattern: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let pattern = pattern.into();
        validate_route_pattern(&pattern)?;

        Ok(Self {
            id: RouteId::generate(),
            pattern,
            use_count: 0,
        })
    }

    /// Rebuild a route loaded from persistent storage
    pub fn from_storage(id: RouteId, pattern: String, use_count: u64) -> Self {
        Self {
            id,
            pattern,
            use_count,
        }
    }

    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    /// Compare against a path already passed through [`normalize_path`]
    pub fn matches(&self, normalized_path: &str) -> bool {
        self.pattern.to_lowercase() == normalized_path
    }

    fn record_usage(&mut self) {
        self.use_count = self.use_count.saturating_add(1);
    }
}

/// API key entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    id: ApiKeyId,
    /// The token presented by callers
    secret: String,
    /// Principal every authorized request acts as
    owner: PrincipalId,
    active: bool,
    use_count: u64,
    /// Empty means the key is valid on every route
    allowed_routes: Vec<AllowedRoute>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new active, unrestricted key
    pub fn new(secret: impl Into<String>, owner: PrincipalId) -> Result<Self, ApiKeyValidationError> {
        let secret = secret.into();
        validate_secret(&secret)?;

        let now = Utc::now();

        Ok(Self {
            id: ApiKeyId::generate(),
            secret,
            owner,
            active: true,
            use_count: 0,
            allowed_routes: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Restrict the key to the given route patterns
    pub fn with_routes<S: AsRef<str>>(
        mut self,
        patterns: &[S],
    ) -> Result<Self, ApiKeyValidationError> {
        self.replace_routes(patterns)?;
        Ok(self)
    }

    /// Rebuild a key loaded from persistent storage
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: ApiKeyId,
        secret: String,
        owner: PrincipalId,
        active: bool,
        use_count: u64,
        allowed_routes: Vec<AllowedRoute>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            secret,
            owner,
            active,
            use_count,
            allowed_routes,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn owner(&self) -> &PrincipalId {
        &self.owner
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn use_count(&self) -> u64 {
        self.use_count
    }

    pub fn allowed_routes(&self) -> &[AllowedRoute] {
        &self.allowed_routes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when the key is limited to its allowed routes
    pub fn is_restricted(&self) -> bool {
        !self.allowed_routes.is_empty()
    }

    /// First allowed route matching the request path, in declaration order
    pub fn route_for(&self, path: &str) -> Option<&AllowedRoute> {
        let normalized = normalize_path(path);
        self.allowed_routes.iter().find(|r| r.matches(&normalized))
    }

    pub fn route(&self, id: &RouteId) -> Option<&AllowedRoute> {
        self.allowed_routes.iter().find(|r| r.id() == id)
    }

    // Mutators

    pub fn set_owner(&mut self, owner: PrincipalId) {
        self.owner = owner;
        self.touch();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Replace the secret, e.g. after regeneration
    pub fn set_secret(&mut self, secret: impl Into<String>) -> Result<(), ApiKeyValidationError> {
        let secret = secret.into();
        validate_secret(&secret)?;
        self.secret = secret;
        self.touch();
        Ok(())
    }

    /// Replace the route list. Routes whose pattern survives keep their id and
    /// usage counter.
    pub fn replace_routes<S: AsRef<str>>(
        &mut self,
        patterns: &[S],
    ) -> Result<(), ApiKeyValidationError> {
        validate_route_patterns(patterns)?;

        let mut previous = std::mem::take(&mut self.allowed_routes);
        let mut routes = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let pattern = pattern.as_ref();

            match previous.iter().position(|r| r.pattern == pattern) {
                Some(pos) => routes.push(previous.swap_remove(pos)),
                None => routes.push(AllowedRoute::new(pattern)?),
            }
        }

        self.allowed_routes = routes;
        self.touch();
        Ok(())
    }

    /// Count one authorized request, and the matched route when there is one
    pub fn record_usage(&mut self, route_id: Option<&RouteId>) {
        self.use_count = self.use_count.saturating_add(1);

        if let Some(route_id) = route_id {
            if let Some(route) = self.allowed_routes.iter_mut().find(|r| r.id() == route_id) {
                route.record_usage();
            }
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> PrincipalId {
        PrincipalId::new("demo").unwrap()
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/API/Foo?x=1&y=2"), "/api/foo");
        assert_eq!(normalize_path("/api/foo"), "/api/foo");
        assert_eq!(normalize_path("/api/foo?"), "/api/foo");
        assert_eq!(normalize_path("?only=query"), "");
    }

    #[test]
    fn test_api_key_defaults() {
        let key = ApiKey::new("s3cret", owner()).unwrap();

        assert!(key.is_active());
        assert_eq!(key.use_count(), 0);
        assert!(!key.is_restricted());
        assert_eq!(key.owner().as_str(), "demo");
    }

    #[test]
    fn test_api_key_rejects_empty_secret() {
        assert!(ApiKey::new("", owner()).is_err());
    }

    #[test]
    fn test_route_for_is_case_insensitive_and_ignores_query() {
        let key = ApiKey::new("s3cret", owner())
            .unwrap()
            .with_routes(&["/api/foo", "/api/Bar"])
            .unwrap();

        assert_eq!(key.route_for("/API/FOO?x=1").unwrap().pattern(), "/api/foo");
        assert_eq!(key.route_for("/api/bar").unwrap().pattern(), "/api/Bar");
        assert!(key.route_for("/api/baz").is_none());
        assert!(key.route_for("/api/foo/extra").is_none());
    }

    #[test]
    fn test_replace_routes_keeps_surviving_counters() {
        let mut key = ApiKey::new("s3cret", owner())
            .unwrap()
            .with_routes(&["/a", "/b"])
            .unwrap();

        let b_id = *key.route_for("/b").unwrap().id();
        key.record_usage(Some(&b_id));

        key.replace_routes(&["/b", "/c"]).unwrap();

        let patterns: Vec<&str> = key.allowed_routes().iter().map(|r| r.pattern()).collect();
        assert_eq!(patterns, vec!["/b", "/c"]);

        let b = key.route_for("/b").unwrap();
        assert_eq!(*b.id(), b_id);
        assert_eq!(b.use_count(), 1);
        assert_eq!(key.route_for("/c").unwrap().use_count(), 0);
    }

    #[test]
    fn test_record_usage() {
        let mut key = ApiKey::new("s3cret", owner())
            .unwrap()
            .with_routes(&["/a"])
            .unwrap();
        let route_id = *key.route_for("/a").unwrap().id();

        key.record_usage(None);
        key.record_usage(Some(&route_id));

        assert_eq!(key.use_count(), 2);
        assert_eq!(key.route(&route_id).unwrap().use_count(), 1);
    }

    #[test]
    fn test_activation_toggle() {
        let mut key = ApiKey::new("s3cret", owner()).unwrap();

        key.deactivate();
        assert!(!key.is_active());

        key.activate();
        assert!(key.is_active());
    }

    #[test]
    fn test_id_parse() {
        let id = ApiKeyId::generate();
        assert_eq!(ApiKeyId::parse(&id.to_string()).unwrap(), id);
        assert!(ApiKeyId::parse("not-a-uuid").is_err());
    }
}
