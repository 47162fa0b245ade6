//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::domain::{ApiKeyRepository, AuditSink, DomainError, TerminalAliasRepository};
use crate::infrastructure::api_key::{InMemoryApiKeyRepository, PostgresApiKeyRepository};
use crate::infrastructure::audit::{InMemoryAuditSink, PostgresAuditSink};
use crate::infrastructure::terminal_alias::{
    InMemoryTerminalAliasRepository, PostgresTerminalAliasRepository,
};

use super::migrations::run_migrations;
use super::postgres::PostgresConfig;

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Every repository the service needs, backed by the same storage
#[derive(Debug, Clone)]
pub struct Repositories {
    pub api_keys: Arc<dyn ApiKeyRepository>,
    pub audit: Arc<dyn AuditSink>,
    pub terminal_aliases: Arc<dyn TerminalAliasRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            api_keys: Arc::new(InMemoryApiKeyRepository::new()),
            audit: Arc::new(InMemoryAuditSink::new()),
            terminal_aliases: Arc::new(InMemoryTerminalAliasRepository::new()),
        }
    }
}

/// Factory for creating repository bundles
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Build the repositories for a backend. PostgreSQL schemas are migrated
    /// before the repositories are handed out.
    pub async fn create(config: &StorageConfig) -> Result<Repositories, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory storage");
                Ok(Repositories::in_memory())
            }
            StorageConfig::Postgres(pg_config) => {
                info!("Using PostgreSQL storage");
                let pool = pg_config.connect().await?;
                run_migrations(&pool).await?;

                Ok(Repositories {
                    api_keys: Arc::new(PostgresApiKeyRepository::new(pool.clone())),
                    audit: Arc::new(PostgresAuditSink::new(pool.clone())),
                    terminal_aliases: Arc::new(PostgresTerminalAliasRepository::new(pool)),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_type_parse() {
        assert_eq!(StorageType::parse("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::parse("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::parse("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::Postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_in_memory_repositories_start_empty() {
        let repos = StorageFactory::create(&StorageConfig::InMemory).await.unwrap();

        assert!(repos.api_keys.list().await.unwrap().is_empty());
        assert!(repos.terminal_aliases.list().await.unwrap().is_empty());
    }
}
