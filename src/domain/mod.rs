//! Domain layer - Core entities, repository traits and errors

pub mod api_key;
pub mod audit;
pub mod error;
pub mod principal;
pub mod terminal_alias;

pub use api_key::{AllowedRoute, ApiKey, ApiKeyId, ApiKeyRepository, RouteId};
pub use audit::{AuditEntry, AuditSink};
pub use error::DomainError;
pub use principal::PrincipalId;
pub use terminal_alias::{TerminalAlias, TerminalAliasId, TerminalAliasRepository};
