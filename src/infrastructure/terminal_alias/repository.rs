//! In-memory terminal alias repository

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::terminal_alias::{TerminalAlias, TerminalAliasId, TerminalAliasRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryTerminalAliasRepository {
    aliases: RwLock<HashMap<TerminalAliasId, TerminalAlias>>,
}

impl InMemoryTerminalAliasRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(
    aliases: &HashMap<TerminalAliasId, TerminalAlias>,
    name: &str,
    except: &TerminalAliasId,
) -> bool {
    aliases
        .values()
        .any(|a| a.name() == name && a.id() != except)
}

fn duplicate_name(name: &str) -> DomainError {
    DomainError::conflict(format!("Alias name '{}' must be unique", name))
}

#[async_trait]
impl TerminalAliasRepository for InMemoryTerminalAliasRepository {
    async fn get(&self, id: &TerminalAliasId) -> Result<Option<TerminalAlias>, DomainError> {
        Ok(self.aliases.read().await.get(id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<TerminalAlias>, DomainError> {
        let aliases = self.aliases.read().await;
        Ok(aliases.values().find(|a| a.name() == name).cloned())
    }

    async fn list(&self) -> Result<Vec<TerminalAlias>, DomainError> {
        let aliases = self.aliases.read().await;

        let mut result: Vec<TerminalAlias> = aliases.values().cloned().collect();
        result.sort_by(|a, b| a.name().cmp(b.name()));

        Ok(result)
    }

    async fn create(&self, alias: TerminalAlias) -> Result<TerminalAlias, DomainError> {
        let mut aliases = self.aliases.write().await;

        if aliases.contains_key(alias.id()) {
            return Err(DomainError::conflict(format!(
                "Alias with ID '{}' already exists",
                alias.id()
            )));
        }

        if name_taken(&aliases, alias.name(), alias.id()) {
            return Err(duplicate_name(alias.name()));
        }

        aliases.insert(*alias.id(), alias.clone());
        Ok(alias)
    }

    async fn update(&self, alias: &TerminalAlias) -> Result<TerminalAlias, DomainError> {
        let mut aliases = self.aliases.write().await;

        if !aliases.contains_key(alias.id()) {
            return Err(DomainError::not_found(format!(
                "Alias '{}' not found",
                alias.id()
            )));
        }

        if name_taken(&aliases, alias.name(), alias.id()) {
            return Err(duplicate_name(alias.name()));
        }

        aliases.insert(*alias.id(), alias.clone());
        Ok(alias.clone())
    }

    async fn delete(&self, id: &TerminalAliasId) -> Result<bool, DomainError> {
        Ok(self.aliases.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_by_name() {
        let repo = InMemoryTerminalAliasRepository::new();
        let alias = TerminalAlias::new("ll", "ls -la").unwrap();
        repo.create(alias.clone()).await.unwrap();

        let found = repo.get_by_name("ll").await.unwrap().unwrap();
        assert_eq!(found.id(), alias.id());
        assert!(repo.get_by_name("LL").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repo = InMemoryTerminalAliasRepository::new();
        repo.create(TerminalAlias::new("ll", "ls -la").unwrap())
            .await
            .unwrap();

        let result = repo.create(TerminalAlias::new("ll", "ls -l").unwrap()).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name_conflicts() {
        let repo = InMemoryTerminalAliasRepository::new();
        repo.create(TerminalAlias::new("ll", "ls -la").unwrap())
            .await
            .unwrap();
        let mut other = TerminalAlias::new("gs", "git status").unwrap();
        repo.create(other.clone()).await.unwrap();

        other.rename("ll").unwrap();
        let result = repo.update(&other).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));

        // Keeping its own name is fine
        other.rename("gs").unwrap();
        other.set_command("git status -sb").unwrap();
        assert!(repo.update(&other).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let repo = InMemoryTerminalAliasRepository::new();
        repo.create(TerminalAlias::new("zz", "echo z").unwrap())
            .await
            .unwrap();
        repo.create(TerminalAlias::new("aa", "echo a").unwrap())
            .await
            .unwrap();

        let names: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["aa", "zz"]);
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryTerminalAliasRepository::new();
        let alias = TerminalAlias::new("ll", "ls -la").unwrap();
        repo.create(alias.clone()).await.unwrap();

        assert!(repo.delete(alias.id()).await.unwrap());
        assert!(!repo.delete(alias.id()).await.unwrap());
    }
}
