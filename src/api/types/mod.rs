//! Wire types of the HTTP surface

pub mod error;
pub mod jsonrpc;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use jsonrpc::{JsonRpc, JsonRpcReply, JsonRpcRequest, JsonRpcResponse, RpcError};
