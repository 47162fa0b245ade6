//! Terminal alias repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{TerminalAlias, TerminalAliasId};
use crate::domain::DomainError;

/// Repository trait for terminal alias storage. Names are unique: `create` and
/// `update` fail with a conflict when another alias already holds the name.
#[async_trait]
pub trait TerminalAliasRepository: Send + Sync + Debug {
    async fn get(&self, id: &TerminalAliasId) -> Result<Option<TerminalAlias>, DomainError>;

    async fn get_by_name(&self, name: &str) -> Result<Option<TerminalAlias>, DomainError>;

    /// List all aliases ordered by name
    async fn list(&self) -> Result<Vec<TerminalAlias>, DomainError>;

    async fn create(&self, alias: TerminalAlias) -> Result<TerminalAlias, DomainError>;

    async fn update(&self, alias: &TerminalAlias) -> Result<TerminalAlias, DomainError>;

    async fn delete(&self, id: &TerminalAliasId) -> Result<bool, DomainError>;
}
