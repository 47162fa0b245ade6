//! API key validation utilities

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during API key validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiKeyValidationError {
    #[error("Invalid API key ID: '{0}'")]
    InvalidId(String),

    #[error("Invalid route ID: '{0}'")]
    InvalidRouteId(String),

    #[error("API key secret cannot be empty")]
    EmptySecret,

    #[error("API key secret exceeds maximum length of {0} characters")]
    SecretTooLong(usize),

    #[error("API key secret cannot contain whitespace")]
    SecretWhitespace,

    #[error("Route pattern cannot be empty")]
    EmptyRoutePattern,

    #[error("Route pattern '{0}' must start with '/'")]
    RouteNotAbsolute(String),

    #[error("Route pattern '{0}' cannot contain a query string")]
    RouteHasQuery(String),

    #[error("Route pattern '{0}' is listed more than once")]
    DuplicateRoute(String),
}

impl From<ApiKeyValidationError> for DomainError {
    fn from(err: ApiKeyValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

pub const MAX_SECRET_LENGTH: usize = 128;

/// Validate a key secret
///
/// Rules:
/// - Cannot be empty
/// - Maximum 128 characters
/// - No whitespace
pub fn validate_secret(secret: &str) -> Result<(), ApiKeyValidationError> {
    if secret.is_empty() {
        return Err(ApiKeyValidationError::EmptySecret);
    }

    if secret.chars().count() > MAX_SECRET_LENGTH {
        return Err(ApiKeyValidationError::SecretTooLong(MAX_SECRET_LENGTH));
    }

    if secret.chars().any(char::is_whitespace) {
        return Err(ApiKeyValidationError::SecretWhitespace);
    }

    Ok(())
}

/// Validate a single allowed route pattern
pub fn validate_route_pattern(pattern: &str) -> Result<(), ApiKeyValidationError> {
    if pattern.is_empty() {
        return Err(ApiKeyValidationError::EmptyRoutePattern);
    }

    if !pattern.starts_with('/') {
        return Err(ApiKeyValidationError::RouteNotAbsolute(pattern.to_string()));
    }

    if pattern.contains('?') {
        return Err(ApiKeyValidationError::RouteHasQuery(pattern.to_string()));
    }

    Ok(())
}

/// Validate a full route list. Patterns compare case-insensitively, so two
/// entries differing only by case are duplicates.
pub fn validate_route_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<(), ApiKeyValidationError> {
    let mut seen = std::collections::HashSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        validate_route_pattern(pattern)?;

        if !seen.insert(pattern.to_lowercase()) {
            return Err(ApiKeyValidationError::DuplicateRoute(pattern.to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_secrets() {
        assert!(validate_secret("abc").is_ok());
        assert!(validate_secret(&"f".repeat(128)).is_ok());
    }

    #[test]
    fn test_invalid_secrets() {
        assert_eq!(validate_secret(""), Err(ApiKeyValidationError::EmptySecret));
        assert_eq!(
            validate_secret(&"f".repeat(129)),
            Err(ApiKeyValidationError::SecretTooLong(128))
        );
        assert_eq!(
            validate_secret("has space"),
            Err(ApiKeyValidationError::SecretWhitespace)
        );
    }

    #[test]
    fn test_route_patterns() {
        assert!(validate_route_pattern("/api/foo").is_ok());
        assert!(validate_route_pattern("").is_err());
        assert!(validate_route_pattern("api/foo").is_err());
        assert!(validate_route_pattern("/api/foo?x=1").is_err());
    }

    #[test]
    fn test_duplicate_routes_case_insensitive() {
        let result = validate_route_patterns(&["/api/foo", "/API/Foo"]);
        assert_eq!(
            result,
            Err(ApiKeyValidationError::DuplicateRoute("/API/Foo".to_string()))
        );

        assert!(validate_route_patterns(&["/api/foo", "/api/bar"]).is_ok());
        assert!(validate_route_patterns::<&str>(&[]).is_ok());
    }
}
