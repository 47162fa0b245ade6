//! Storage infrastructure - backend selection, connection pooling and migrations

mod factory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use migrations::{run_migrations, schema_migrations, Migration, PostgresMigrator};
pub use postgres::PostgresConfig;
pub(crate) use postgres::{counter_from_db, counter_to_db, is_unique_violation};
