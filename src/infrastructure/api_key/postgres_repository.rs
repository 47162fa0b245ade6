//! PostgreSQL API key repository implementation

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::api_key::{AllowedRoute, ApiKey, ApiKeyId, ApiKeyRepository, RouteId};
use crate::domain::{DomainError, PrincipalId};
use crate::infrastructure::storage::{counter_from_db, counter_to_db, is_unique_violation};

const KEY_COLUMNS: &str = "id, secret, owner, active, use_count, created_at, updated_at";

/// PostgreSQL implementation of ApiKeyRepository
#[derive(Debug, Clone)]
pub struct PostgresApiKeyRepository {
    pool: PgPool,
}

impl PostgresApiKeyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn routes_for(&self, key_id: Uuid) -> Result<Vec<AllowedRoute>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, pattern, use_count
            FROM api_key_routes
            WHERE key_id = $1
            ORDER BY position
            "#,
        )
        .bind(key_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to load key routes: {}", e)))?;

        rows.iter().map(row_to_route).collect()
    }

    async fn load(&self, row: Option<PgRow>) -> Result<Option<ApiKey>, DomainError> {
        match row {
            Some(row) => {
                let id: Uuid = row
                    .try_get("id")
                    .map_err(|e| DomainError::storage(format!("Invalid key row: {}", e)))?;
                let routes = self.routes_for(id).await?;
                Ok(Some(row_to_api_key(&row, routes)?))
            }
            None => Ok(None),
        }
    }
}

async fn insert_routes(
    tx: &mut Transaction<'_, Postgres>,
    api_key: &ApiKey,
) -> Result<(), DomainError> {
    for (position, route) in api_key.allowed_routes().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO api_key_routes (id, key_id, position, pattern, use_count)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET position = EXCLUDED.position, pattern = EXCLUDED.pattern
            "#,
        )
        .bind(route.id().as_uuid())
        .bind(api_key.id().as_uuid())
        .bind(position as i32)
        .bind(route.pattern())
        .bind(counter_to_db(route.use_count()))
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to save key route: {}", e)))?;
    }

    Ok(())
}

fn map_write_error(err: sqlx::Error, action: &str) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::conflict("API key secret must be unique")
    } else {
        DomainError::storage(format!("Failed to {} API key: {}", action, err))
    }
}

#[async_trait]
impl ApiKeyRepository for PostgresApiKeyRepository {
    async fn get(&self, id: &ApiKeyId) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM api_keys WHERE id = $1", KEY_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get API key: {}", e)))?;

        self.load(row).await
    }

    async fn find_active_by_secret(&self, secret: &str) -> Result<Option<ApiKey>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM api_keys WHERE secret = $1 AND active = TRUE",
            KEY_COLUMNS
        ))
        .bind(secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to look up API key: {}", e)))?;

        self.load(row).await
    }

    async fn create(&self, api_key: ApiKey) -> Result<ApiKey, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO api_keys (id, secret, owner, active, use_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(api_key.id().as_uuid())
        .bind(api_key.secret())
        .bind(api_key.owner().as_str())
        .bind(api_key.is_active())
        .bind(counter_to_db(api_key.use_count()))
        .bind(api_key.created_at())
        .bind(api_key.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "create"))?;

        insert_routes(&mut tx, &api_key).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit API key: {}", e)))?;

        Ok(api_key)
    }

    async fn update(&self, api_key: &ApiKey) -> Result<ApiKey, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let result = sqlx::query(
            r#"
            UPDATE api_keys
            SET secret = $2, owner = $3, active = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(api_key.id().as_uuid())
        .bind(api_key.secret())
        .bind(api_key.owner().as_str())
        .bind(api_key.is_active())
        .bind(api_key.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "update"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "API key '{}' not found",
                api_key.id()
            )));
        }

        let kept: Vec<Uuid> = api_key
            .allowed_routes()
            .iter()
            .map(|r| r.id().as_uuid())
            .collect();

        sqlx::query("DELETE FROM api_key_routes WHERE key_id = $1 AND NOT (id = ANY($2))")
            .bind(api_key.id().as_uuid())
            .bind(&kept)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to prune key routes: {}", e)))?;

        insert_routes(&mut tx, api_key).await?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit API key: {}", e)))?;

        self.get(api_key.id())
            .await?
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", api_key.id())))
    }

    async fn delete(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete API key: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<ApiKey>, DomainError> {
        let key_rows = sqlx::query(&format!(
            "SELECT {} FROM api_keys ORDER BY created_at",
            KEY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list API keys: {}", e)))?;

        let route_rows = sqlx::query(
            "SELECT id, key_id, pattern, use_count FROM api_key_routes ORDER BY key_id, position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list key routes: {}", e)))?;

        let mut routes_by_key: HashMap<Uuid, Vec<AllowedRoute>> = HashMap::new();

        for row in &route_rows {
            let key_id: Uuid = row
                .try_get("key_id")
                .map_err(|e| DomainError::storage(format!("Invalid route row: {}", e)))?;
            routes_by_key.entry(key_id).or_default().push(row_to_route(row)?);
        }

        let mut keys = Vec::with_capacity(key_rows.len());

        for row in &key_rows {
            let id: Uuid = row
                .try_get("id")
                .map_err(|e| DomainError::storage(format!("Invalid key row: {}", e)))?;
            let routes = routes_by_key.remove(&id).unwrap_or_default();
            keys.push(row_to_api_key(row, routes)?);
        }

        Ok(keys)
    }

    async fn record_usage(
        &self,
        id: &ApiKeyId,
        route_id: Option<&RouteId>,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE api_keys SET use_count = use_count + 1 WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record key usage: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("API key '{}' not found", id)));
        }

        if let Some(route_id) = route_id {
            sqlx::query(
                "UPDATE api_key_routes SET use_count = use_count + 1 WHERE id = $1 AND key_id = $2",
            )
            .bind(route_id.as_uuid())
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record route usage: {}", e)))?;
        }

        Ok(())
    }
}

fn row_to_route(row: &PgRow) -> Result<AllowedRoute, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid route row: {}", e));

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let pattern: String = row.try_get("pattern").map_err(map_err)?;
    let use_count: i64 = row.try_get("use_count").map_err(map_err)?;

    Ok(AllowedRoute::from_storage(
        RouteId::from(id),
        pattern,
        counter_from_db(use_count),
    ))
}

fn row_to_api_key(row: &PgRow, routes: Vec<AllowedRoute>) -> Result<ApiKey, DomainError> {
    let map_err = |e: sqlx::Error| DomainError::storage(format!("Invalid key row: {}", e));

    let id: Uuid = row.try_get("id").map_err(map_err)?;
    let owner: String = row.try_get("owner").map_err(map_err)?;
    let use_count: i64 = row.try_get("use_count").map_err(map_err)?;

    let owner = PrincipalId::new(owner)
        .map_err(|e| DomainError::storage(format!("Invalid stored key owner: {}", e)))?;

    Ok(ApiKey::from_storage(
        ApiKeyId::from(id),
        row.try_get("secret").map_err(map_err)?,
        owner,
        row.try_get("active").map_err(map_err)?,
        counter_from_db(use_count),
        routes,
        row.try_get("created_at").map_err(map_err)?,
        row.try_get("updated_at").map_err(map_err)?,
    ))
}
