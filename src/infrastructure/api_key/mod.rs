//! API Key infrastructure implementations
//!
//! Secret generation, repositories, the key store used by the dispatch gate and
//! the administrative service.

mod generator;
mod key_store;
mod postgres_repository;
mod repository;
mod service;

pub use generator::SecretGenerator;
pub use key_store::{KeyStore, Resolution};
pub use postgres_repository::PostgresApiKeyRepository;
pub use repository::InMemoryApiKeyRepository;
pub use service::{ApiKeyService, CreateApiKey, UpdateApiKey};
