//! Audit trail domain
//!
//! Human-readable notes attached to an API key: tracked field changes made by
//! administrators and usage notes appended by the dispatch gate.

mod entity;
mod sink;

pub use entity::AuditEntry;
pub use sink::AuditSink;

#[cfg(test)]
pub use sink::MockAuditSink;
