//! Built-in JSON-RPC procedures

mod system;
mod terminal;

pub use system::{version, whoami};
pub use terminal::{alias, aliases};
