//! ChatGateway trait definition.
//!
//! The gateway is stateless: every call carries the full message history,
//! system message first.

use ppss_types::gateway::{GatewayError, GatewayReply};
use ppss_types::message::Message;

/// Trait for chat gateway backends (live LLM provider, placeholder).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations are wrapped in `BoxChatGateway` for runtime selection.
pub trait ChatGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "openai", "placeholder").
    fn name(&self) -> &str;

    /// Model identifier used for chat calls.
    fn model(&self) -> &str;

    /// Send an ordered message list and receive the assistant reply.
    fn send(
        &self,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<GatewayReply, GatewayError>> + Send;

    /// Generate images for a prompt, returning their URLs in order.
    fn generate_images(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, GatewayError>> + Send;
}
