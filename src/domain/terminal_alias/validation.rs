//! Terminal alias validation

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerminalAliasValidationError {
    #[error("Invalid alias ID: '{0}'")]
    InvalidId(String),

    #[error("Alias name cannot be empty")]
    EmptyName,

    #[error("Alias name exceeds maximum length of {0} characters")]
    NameTooLong(usize),

    #[error("Alias name cannot contain whitespace")]
    NameWhitespace,

    #[error("Alias command cannot be empty")]
    EmptyCommand,
}

impl From<TerminalAliasValidationError> for DomainError {
    fn from(err: TerminalAliasValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}

const MAX_ALIAS_NAME_LENGTH: usize = 64;

/// Alias names are typed at a prompt, so they are single words
pub fn validate_alias_name(name: &str) -> Result<(), TerminalAliasValidationError> {
    if name.is_empty() {
        return Err(TerminalAliasValidationError::EmptyName);
    }

    if name.chars().count() > MAX_ALIAS_NAME_LENGTH {
        return Err(TerminalAliasValidationError::NameTooLong(MAX_ALIAS_NAME_LENGTH));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(TerminalAliasValidationError::NameWhitespace);
    }

    Ok(())
}

pub fn validate_alias_command(command: &str) -> Result<(), TerminalAliasValidationError> {
    if command.trim().is_empty() {
        return Err(TerminalAliasValidationError::EmptyCommand);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_names() {
        assert!(validate_alias_name("ll").is_ok());
        assert_eq!(validate_alias_name(""), Err(TerminalAliasValidationError::EmptyName));
        assert_eq!(
            validate_alias_name("two words"),
            Err(TerminalAliasValidationError::NameWhitespace)
        );
        assert_eq!(
            validate_alias_name(&"a".repeat(65)),
            Err(TerminalAliasValidationError::NameTooLong(64))
        );
    }

    #[test]
    fn test_alias_commands() {
        assert!(validate_alias_command("ls -la").is_ok());
        assert_eq!(
            validate_alias_command("   "),
            Err(TerminalAliasValidationError::EmptyCommand)
        );
    }
}
