//! Dispatch gate
//!
//! Every declared route is registered in a [`RouteTable`] together with its
//! handler. The [`key_gate`] middleware consults the table for each request,
//! validates the `key` carried in the JSON-RPC params of protected routes,
//! attaches a [`CallerContext`] and meters successful calls.

mod context;
mod error;
mod gate;
mod middleware;
mod routes;

pub use context::CallerContext;
pub use error::GateError;
pub use gate::KeyGate;
pub use middleware::key_gate;
pub use routes::{Enforcement, RouteDeclaration, RouteKind, RouteTable, Routes};
