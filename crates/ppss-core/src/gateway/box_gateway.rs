//! BoxChatGateway -- object-safe dynamic dispatch wrapper for ChatGateway.
//!
//! 1. `ChatGatewayDyn` is an object-safe mirror of `ChatGateway` with boxed futures
//! 2. Blanket-impl `ChatGatewayDyn` for all `T: ChatGateway`
//! 3. `BoxChatGateway` wraps `Box<dyn ChatGatewayDyn>`, delegates, and bounds
//!    every call with a timeout

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{Instrument, info_span, warn};

use ppss_types::gateway::{GatewayError, GatewayReply};
use ppss_types::message::Message;

use super::provider::ChatGateway;

/// Default upper bound on a single gateway call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);

/// Object-safe version of [`ChatGateway`] with boxed futures.
pub trait ChatGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn model(&self) -> &str;

    fn send_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<GatewayReply, GatewayError>> + Send + 'a>>;

    fn generate_images_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, GatewayError>> + Send + 'a>>;
}

impl<T: ChatGateway> ChatGatewayDyn for T {
    fn name(&self) -> &str {
        ChatGateway::name(self)
    }

    fn model(&self) -> &str {
        ChatGateway::model(self)
    }

    fn send_boxed<'a>(
        &'a self,
        messages: &'a [Message],
    ) -> Pin<Box<dyn Future<Output = Result<GatewayReply, GatewayError>> + Send + 'a>> {
        Box::pin(self.send(messages))
    }

    fn generate_images_boxed<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, GatewayError>> + Send + 'a>> {
        Box::pin(self.generate_images(prompt))
    }
}

/// Type-erased chat gateway selected once at process start.
///
/// Callers see the same interface whether the live provider or the
/// placeholder sits behind it. A call that exceeds the timeout resolves to
/// [`GatewayError::Timeout`].
pub struct BoxChatGateway {
    inner: Box<dyn ChatGatewayDyn + Send + Sync>,
    timeout: Duration,
}

impl BoxChatGateway {
    /// Wrap a concrete `ChatGateway` with the default timeout.
    pub fn new<T: ChatGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
            timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send a message list and wait (bounded) for the reply.
    pub async fn send(&self, messages: &[Message]) -> Result<GatewayReply, GatewayError> {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.system = self.inner.name(),
            gen_ai.request.model = self.inner.model(),
            message_count = messages.len(),
        );
        self.bounded(self.inner.send_boxed(messages))
            .instrument(span)
            .await
    }

    /// Generate images for a prompt (bounded by the same timeout).
    pub async fn generate_images(&self, prompt: &str) -> Result<Vec<String>, GatewayError> {
        let span = info_span!("gen_ai.generate_images", gen_ai.system = self.inner.name());
        self.bounded(self.inner.generate_images_boxed(prompt))
            .instrument(span)
            .await
    }

    async fn bounded<F, R>(&self, call: F) -> Result<R, GatewayError>
    where
        F: Future<Output = Result<R, GatewayError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Gateway call timed out");
                Err(GatewayError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}
