//! Principal identity
//!
//! A principal is a user of the host platform. Keys are owned by a principal and
//! every request authorized through a key acts as that principal.

use serde::{Deserialize, Serialize};

use super::DomainError;

const MAX_PRINCIPAL_ID_LENGTH: usize = 64;

/// Identifier of a platform user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a new PrincipalId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();

        if id.is_empty() {
            return Err(DomainError::validation("Principal ID cannot be empty"));
        }

        if id.chars().count() > MAX_PRINCIPAL_ID_LENGTH {
            return Err(DomainError::validation(format!(
                "Principal ID exceeds maximum length of {} characters",
                MAX_PRINCIPAL_ID_LENGTH
            )));
        }

        if let Some(c) = id.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::validation(format!(
                "Principal ID contains invalid character: {:?}",
                c
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_principal() {
        let id = PrincipalId::new("admin").unwrap();
        assert_eq!(id.as_str(), "admin");
        assert_eq!(id.to_string(), "admin");
    }

    #[test]
    fn test_invalid_principal() {
        assert!(PrincipalId::new("").is_err());
        assert!(PrincipalId::new("two words").is_err());
        assert!(PrincipalId::new("tab\tbed").is_err());
        assert!(PrincipalId::new("x".repeat(65)).is_err());
    }

    #[test]
    fn test_principal_deserialize_validates() {
        let ok: Result<PrincipalId, _> = serde_json::from_str("\"demo\"");
        assert!(ok.is_ok());

        let bad: Result<PrincipalId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}
