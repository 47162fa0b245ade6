//! Terminal alias service

use std::sync::Arc;

use tracing::info;

use crate::domain::terminal_alias::{TerminalAlias, TerminalAliasId, TerminalAliasRepository};
use crate::domain::DomainError;

#[derive(Debug, Clone, Default)]
pub struct UpdateTerminalAlias {
    pub name: Option<String>,
    pub command: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TerminalAliasService {
    repository: Arc<dyn TerminalAliasRepository>,
}

impl TerminalAliasService {
    pub fn new(repository: Arc<dyn TerminalAliasRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        name: impl Into<String>,
        command: impl Into<String>,
    ) -> Result<TerminalAlias, DomainError> {
        let alias = TerminalAlias::new(name, command)?;
        let created = self.repository.create(alias).await?;

        info!(alias = %created.name(), "Terminal alias created");
        Ok(created)
    }

    pub async fn get(&self, id: &TerminalAliasId) -> Result<Option<TerminalAlias>, DomainError> {
        self.repository.get(id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<TerminalAlias>, DomainError> {
        self.repository.get_by_name(name).await
    }

    pub async fn list(&self) -> Result<Vec<TerminalAlias>, DomainError> {
        self.repository.list().await
    }

    pub async fn update(
        &self,
        id: &TerminalAliasId,
        changes: UpdateTerminalAlias,
    ) -> Result<TerminalAlias, DomainError> {
        let mut alias = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Alias '{}' not found", id)))?;

        if let Some(name) = changes.name {
            alias.rename(name)?;
        }

        if let Some(command) = changes.command {
            alias.set_command(command)?;
        }

        let updated = self.repository.update(&alias).await?;
        info!(alias = %updated.name(), "Terminal alias updated");

        Ok(updated)
    }

    pub async fn delete(&self, id: &TerminalAliasId) -> Result<bool, DomainError> {
        let deleted = self.repository.delete(id).await?;

        if deleted {
            info!(alias_id = %id, "Terminal alias deleted");
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::terminal_alias::InMemoryTerminalAliasRepository;

    fn service() -> TerminalAliasService {
        TerminalAliasService::new(Arc::new(InMemoryTerminalAliasRepository::new()))
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let service = service();
        let alias = service.create("ll", "ls -la").await.unwrap();

        assert_eq!(service.get(alias.id()).await.unwrap().unwrap().name(), "ll");
        assert_eq!(
            service.get_by_name("ll").await.unwrap().unwrap().command(),
            "ls -la"
        );
    }

    #[tokio::test]
    async fn test_create_validates() {
        let service = service();
        let result = service.create("bad name", "ls").await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_and_conflict() {
        let service = service();
        service.create("ll", "ls -la").await.unwrap();
        let gs = service.create("gs", "git status").await.unwrap();

        let updated = service
            .update(
                gs.id(),
                UpdateTerminalAlias {
                    command: Some("git status -sb".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.command(), "git status -sb");

        let result = service
            .update(
                gs.id(),
                UpdateTerminalAlias {
                    name: Some("ll".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_missing() {
        let service = service();
        let result = service
            .update(&TerminalAliasId::generate(), UpdateTerminalAlias::default())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
