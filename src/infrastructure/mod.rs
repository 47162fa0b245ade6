//! Infrastructure layer - storage backends, services and runtime plumbing

pub mod api_key;
pub mod audit;
pub mod logging;
pub mod metrics;
pub mod storage;
pub mod terminal_alias;
