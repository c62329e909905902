//! Placeholder gateway used when no provider credentials are configured.
//!
//! Replies with a fixed informational string and deterministic image links,
//! so the whole pipeline (persistence included) can run offline.

use url::Url;

use ppss_types::gateway::{GatewayError, GatewayReply};
use ppss_types::message::Message;

use super::provider::ChatGateway;

/// Fixed reply returned for every chat call.
pub const PLACEHOLDER_REPLY: &str = "ChatGPT API key not configured. This placeholder response confirms the personalized agent pipeline is wired.";

const PLACEHOLDER_IMAGE_HOST: &str = "https://picsum.photos";
const DEFAULT_IMAGE_PROMPT: &str = "design prompt";

#[derive(Debug, Default, Clone)]
pub struct PlaceholderGateway;

impl PlaceholderGateway {
    pub fn new() -> Self {
        Self
    }
}

/// `https://picsum.photos/seed/{prompt}-{n}/640/360` with the seed segment percent-encoded.
fn seeded_image_url(prompt: &str, n: usize) -> Result<String, GatewayError> {
    let mut url = Url::parse(PLACEHOLDER_IMAGE_HOST)
        .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| GatewayError::InvalidRequest("image host cannot be a base".to_string()))?
        .clear()
        .push("seed")
        .push(&format!("{prompt}-{n}"))
        .push("640")
        .push("360");
    Ok(url.into())
}

impl ChatGateway for PlaceholderGateway {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn model(&self) -> &str {
        "placeholder"
    }

    async fn send(&self, _messages: &[Message]) -> Result<GatewayReply, GatewayError> {
        Ok(GatewayReply {
            content: PLACEHOLDER_REPLY.to_string(),
        })
    }

    async fn generate_images(&self, prompt: &str) -> Result<Vec<String>, GatewayError> {
        let prompt = if prompt.trim().is_empty() {
            DEFAULT_IMAGE_PROMPT
        } else {
            prompt
        };
        Ok(vec![seeded_image_url(prompt, 1)?, seeded_image_url(prompt, 2)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_returns_fixed_reply() {
        let gateway = PlaceholderGateway::new();
        let reply = gateway
            .send(&[Message::system("sys"), Message::user("Hello")])
            .await
            .unwrap();
        assert_eq!(reply.content, PLACEHOLDER_REPLY);
    }

    #[tokio::test]
    async fn test_images_are_seeded_by_prompt() {
        let gateway = PlaceholderGateway::new();
        let urls = gateway.generate_images("bus lane").await.unwrap();
        assert_eq!(
            urls,
            vec![
                "https://picsum.photos/seed/bus%20lane-1/640/360".to_string(),
                "https://picsum.photos/seed/bus%20lane-2/640/360".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_prompt_uses_default_seed() {
        let gateway = PlaceholderGateway::new();
        let urls = gateway.generate_images("").await.unwrap();
        assert_eq!(urls[0], "https://picsum.photos/seed/design%20prompt-1/640/360");
    }

    #[tokio::test]
    async fn test_slash_in_prompt_is_escaped() {
        let gateway = PlaceholderGateway::new();
        let urls = gateway.generate_images("a/b").await.unwrap();
        assert_eq!(urls[1], "https://picsum.photos/seed/a%2Fb-2/640/360");
    }
}
