//! API layer - HTTP endpoints and middleware

pub mod admin;
pub mod dispatch;
pub mod health;
pub mod middleware;
pub mod router;
pub mod rpc;
pub mod state;
pub mod types;

pub use router::{create_router, declared_routes};
pub use state::{AdminAccess, AppState};
