//! Chat gateway request/response types.
//!
//! The gateway is the boundary to the external LLM provider: an ordered list
//! of messages goes in, a single reply text comes out.

use serde::{Deserialize, Serialize};

/// The assistant reply produced by a gateway call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReply {
    pub content: String,
}

/// Errors from chat gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited")]
    RateLimited,

    #[error("gateway call timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}
