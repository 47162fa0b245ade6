//! Audit entry entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::api_key::ApiKeyId;
use crate::domain::principal::PrincipalId;

/// A timestamped note on an API key, attributed to a principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    id: Uuid,
    key_id: ApiKeyId,
    author: PrincipalId,
    body: String,
    created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(key_id: ApiKeyId, author: PrincipalId, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key_id,
            author,
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    /// Note appended by the gate after a metered request
    pub fn key_used(
        key_id: ApiKeyId,
        author: PrincipalId,
        remote_addr: &str,
        path: &str,
    ) -> Self {
        Self::new(
            key_id,
            author,
            format!("{} used this key in '{}'", remote_addr, path),
        )
    }

    /// Rebuild an entry loaded from persistent storage
    pub fn from_storage(
        id: Uuid,
        key_id: ApiKeyId,
        author: PrincipalId,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            key_id,
            author,
            body,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn key_id(&self) -> &ApiKeyId {
        &self.key_id
    }

    pub fn author(&self) -> &PrincipalId {
        &self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_used_body() {
        let entry = AuditEntry::key_used(
            ApiKeyId::generate(),
            PrincipalId::new("demo").unwrap(),
            "10.0.0.7",
            "/jsonrpc/whoami",
        );

        assert_eq!(entry.body(), "10.0.0.7 used this key in '/jsonrpc/whoami'");
        assert_eq!(entry.author().as_str(), "demo");
    }
}
