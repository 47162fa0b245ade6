//! PostgreSQL terminal alias repository

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::terminal_alias::{TerminalAlias, TerminalAliasId, TerminalAliasRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::is_unique_violation;

#[derive(Debug, Clone)]
pub struct PostgresTerminalAliasRepository {
    pool: PgPool,
}

impl PostgresTerminalAliasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(err: sqlx::Error, alias: &TerminalAlias, action: &str) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::conflict(format!("Alias name '{}' must be unique", alias.name()))
    } else {
        DomainError::storage(format!("Failed to {} alias: {}", action, err))
    }
}

#[async_trait]
impl TerminalAliasRepository for PostgresTerminalAliasRepository {
    async fn get(&self, id: &TerminalAliasId) -> Result<Option<TerminalAlias>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, command, created_at, updated_at FROM terminal_aliases WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get alias: {}", e)))?;

        row.as_ref().map(row_to_alias).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<TerminalAlias>, DomainError> {
        let row = sqlx::query(
            "SELECT id, name, command, created_at, updated_at FROM terminal_aliases WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get alias by name: {}", e)))?;

        row.as_ref().map(row_to_alias).transpose()
    }

    async fn list(&self) -> Result<Vec<TerminalAlias>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, name, command, created_at, updated_at FROM terminal_aliases ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list aliases: {}", e)))?;

        rows.iter().map(row_to_alias).collect()
    }

    async fn create(&self, alias: TerminalAlias) -> Result<TerminalAlias, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO terminal_aliases (id, name, command, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(alias.id().as_uuid())
        .bind(alias.name())
        .bind(alias.command())
        .bind(alias.created_at())
        .bind(alias.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &alias, "create"))?;

        Ok(alias)
    }

    async fn update(&self, alias: &TerminalAlias) -> Result<TerminalAlias, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE terminal_aliases
            SET name = $2, command = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(alias.id().as_uuid())
        .bind(alias.name())
        .bind(alias.command())
        .bind(alias.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, alias, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Alias '{}' not found",
                alias.id()
            )));
        }

        Ok(alias.clone())
    }

    async fn delete(&self, id: &TerminalAliasId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM terminal_aliases WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete alias: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_alias(row: &PgRow) -> Result<TerminalAlias, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid alias row: {}", e));

    let id: Uuid = row.try_get("id").map_err(map_err)?;

    Ok(TerminalAlias::from_storage(
        TerminalAliasId::from(id),
        row.try_get("name").map_err(map_err)?,
        row.try_get("command").map_err(map_err)?,
        row.try_get("created_at").map_err(map_err)?,
        row.try_get("updated_at").map_err(map_err)?,
    ))
}
