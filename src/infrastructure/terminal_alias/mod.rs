//! Terminal alias infrastructure

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresTerminalAliasRepository;
pub use repository::InMemoryTerminalAliasRepository;
pub use service::{TerminalAliasService, UpdateTerminalAlias};
