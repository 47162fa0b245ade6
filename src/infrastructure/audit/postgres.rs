//! PostgreSQL audit sink

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::api_key::ApiKeyId;
use crate::domain::audit::{AuditEntry, AuditSink};
use crate::domain::{DomainError, PrincipalId};

#[derive(Debug, Clone)]
pub struct PostgresAuditSink {
    pool: PgPool,
}

impl PostgresAuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditSink for PostgresAuditSink {
    async fn post(&self, entry: AuditEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO api_key_audit (id, key_id, author, body, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id())
        .bind(entry.key_id().as_uuid())
        .bind(entry.author().as_str())
        .bind(entry.body())
        .bind(entry.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to post audit entry: {}", e)))?;

        Ok(())
    }

    async fn list_for_key(&self, key_id: &ApiKeyId) -> Result<Vec<AuditEntry>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, key_id, author, body, created_at
            FROM api_key_audit
            WHERE key_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(key_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list audit entries: {}", e)))?;

        rows.iter().map(row_to_entry).collect()
    }

    async fn purge_key(&self, key_id: &ApiKeyId) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM api_key_audit WHERE key_id = $1")
            .bind(key_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to purge audit entries: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}

fn row_to_entry(row: &PgRow) -> Result<AuditEntry, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid audit row: {}", e));

    let key_id: Uuid = row.try_get("key_id").map_err(map_err)?;
    let author: String = row.try_get("author").map_err(map_err)?;
    let author = PrincipalId::new(author)
        .map_err(|e| DomainError::storage(format!("Invalid stored audit author: {}", e)))?;

    Ok(AuditEntry::from_storage(
        row.try_get("id").map_err(map_err)?,
        ApiKeyId::from(key_id),
        author,
        row.try_get("body").map_err(map_err)?,
        row.try_get("created_at").map_err(map_err)?,
    ))
}
