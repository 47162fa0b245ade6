//! Terminal alias domain
//!
//! Named shortcuts for terminal commands. Alias names are unique.

mod entity;
mod repository;
mod validation;

pub use entity::{TerminalAlias, TerminalAliasId};
pub use repository::TerminalAliasRepository;
pub use validation::{validate_alias_command, validate_alias_name, TerminalAliasValidationError};
