//! Terminal alias entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_alias_command, validate_alias_name, TerminalAliasValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerminalAliasId(Uuid);

impl TerminalAliasId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: &str) -> Result<Self, TerminalAliasValidationError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| TerminalAliasValidationError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TerminalAliasId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TerminalAliasId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named shortcut for a terminal command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalAlias {
    id: TerminalAliasId,
    name: String,
    command: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TerminalAlias {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
    ) -> Result<Self, TerminalAliasValidationError> {
        let name = name.into();
        let command = command.into();
        validate_alias_name(&name)?;
        validate_alias_command(&command)?;

        let now = Utc::now();

        Ok(Self {
            id: TerminalAliasId::generate(),
            name,
            command,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an alias loaded from persistent storage
    pub fn from_storage(
        id: TerminalAliasId,
        name: String,
        command: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            command,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &TerminalAliasId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TerminalAliasValidationError> {
        let name = name.into();
        validate_alias_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_command(
        &mut self,
        command: impl Into<String>,
    ) -> Result<(), TerminalAliasValidationError> {
        let command = command.into();
        validate_alias_command(&command)?;
        self.command = command;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
