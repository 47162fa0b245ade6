//! API Key domain
//!
//! Keys, the routes a key may be restricted to, and the repository that
//! persists them.

mod entity;
mod repository;
mod validation;

pub use entity::{normalize_path, AllowedRoute, ApiKey, ApiKeyId, RouteId};
pub use repository::ApiKeyRepository;
pub use validation::{
    validate_route_pattern, validate_route_patterns, validate_secret, ApiKeyValidationError,
    MAX_SECRET_LENGTH,
};
