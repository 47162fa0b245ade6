//! Server information procedures

use serde::Serialize;

use crate::api::dispatch::CallerContext;
use crate::api::types::{JsonRpc, JsonRpcReply};

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub server: &'static str,
    pub version: &'static str,
}

pub async fn version(JsonRpc(call): JsonRpc) -> JsonRpcReply {
    JsonRpcReply::result(
        call.id,
        VersionInfo {
            server: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// The identity the gate attached to this call
pub async fn whoami(caller: CallerContext, JsonRpc(call): JsonRpc) -> JsonRpcReply {
    JsonRpcReply::result(call.id, caller)
}
