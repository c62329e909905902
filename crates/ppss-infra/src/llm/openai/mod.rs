//! Live chat gateway for any OpenAI-compatible API.
//!
//! Chat completions go through [`async_openai`]; image generation is a
//! direct `reqwest` call (see [`images`]).

pub mod images;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
    ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
    CreateChatCompletionRequest, ImageUrl,
};
use secrecy::{ExposeSecret, SecretString};

use ppss_core::gateway::provider::ChatGateway;
use ppss_types::config::GatewayConfig;
use ppss_types::gateway::{GatewayError, GatewayReply};
use ppss_types::message::{ContentPart, Message, MessageRole};

use self::images::ImageClient;

/// Chat gateway backed by an OpenAI-compatible endpoint.
///
/// Does not derive Debug: the underlying clients hold the API key.
pub struct OpenAiGateway {
    client: Client<OpenAIConfig>,
    images: ImageClient,
    model: String,
}

impl OpenAiGateway {
    pub fn new(config: &GatewayConfig, api_key: SecretString) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            images: ImageClient::new(&config.base_url, &config.image_model, api_key),
            model: config.model.clone(),
        }
    }

    fn build_request(&self, messages: &[Message]) -> CreateChatCompletionRequest {
        CreateChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.iter().map(convert_message).collect(),
            ..Default::default()
        }
    }
}

fn convert_message(msg: &Message) -> ChatCompletionRequestMessage {
    match msg.role {
        MessageRole::System => ChatCompletionRequestSystemMessage {
            content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
            name: None,
        }
        .into(),
        MessageRole::User => {
            let content = if msg.parts.is_empty() {
                ChatCompletionRequestUserMessageContent::Text(msg.content.clone())
            } else {
                ChatCompletionRequestUserMessageContent::Array(
                    msg.parts.iter().map(convert_part).collect(),
                )
            };
            ChatCompletionRequestUserMessage {
                content,
                name: None,
            }
            .into()
        }
        MessageRole::Assistant =>
        {
            #[allow(deprecated)]
            ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            }
            .into()
        }
    }
}

fn convert_part(part: &ContentPart) -> ChatCompletionRequestUserMessageContentPart {
    match part {
        ContentPart::Text { text } => ChatCompletionRequestUserMessageContentPart::Text(
            ChatCompletionRequestMessageContentPartText { text: text.clone() },
        ),
        ContentPart::ImageUrl { url } => ChatCompletionRequestUserMessageContentPart::ImageUrl(
            ChatCompletionRequestMessageContentPartImage {
                image_url: ImageUrl {
                    url: url.clone(),
                    detail: None,
                },
            },
        ),
    }
}

impl ChatGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, messages: &[Message]) -> Result<GatewayReply, GatewayError> {
        let response = self
            .client
            .chat()
            .create(self.build_request(messages))
            .await
            .map_err(map_openai_error)?;

        // A missing choice or null content is an empty reply, not an error.
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(GatewayReply { content })
    }

    async fn generate_images(&self, prompt: &str) -> Result<Vec<String>, GatewayError> {
        self.images.generate(prompt).await
    }
}

/// Map an `async_openai::error::OpenAIError` to a [`GatewayError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> GatewayError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
            {
                GatewayError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                GatewayError::RateLimited
            } else {
                GatewayError::Provider {
                    message: api_err.message.clone(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => GatewayError::AuthenticationFailed,
            Some(429) => GatewayError::RateLimited,
            _ => GatewayError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            GatewayError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => GatewayError::InvalidRequest(msg.clone()),
        _ => GatewayError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> OpenAiGateway {
        OpenAiGateway::new(&GatewayConfig::default(), SecretString::from("sk-test".to_string()))
    }

    #[test]
    fn test_identity() {
        let gw = gateway();
        assert_eq!(ChatGateway::name(&gw), "openai");
        assert_eq!(ChatGateway::model(&gw), "gpt-4o-mini");
    }

    #[test]
    fn test_build_request_keeps_order_and_model() {
        let gw = gateway();
        let req = gw.build_request(&[
            Message::system("sys"),
            Message::user("hi"),
            Message::assistant("hello"),
        ]);

        assert_eq!(req.model, "gpt-4o-mini");
        assert_eq!(req.messages.len(), 3);
        assert!(matches!(req.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(req.messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(req.messages[2], ChatCompletionRequestMessage::Assistant(_)));
    }

    #[test]
    fn test_multimodal_user_message_uses_parts() {
        let msg = Message::user_parts(vec![
            ContentPart::Text {
                text: "User question: why?".to_string(),
            },
            ContentPart::ImageUrl {
                url: "https://example.com/a.png".to_string(),
            },
        ]);

        let ChatCompletionRequestMessage::User(user) = convert_message(&msg) else {
            panic!("expected a user message");
        };
        let ChatCompletionRequestUserMessageContent::Array(parts) = user.content else {
            panic!("expected array content");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(
            parts[1],
            ChatCompletionRequestUserMessageContentPart::ImageUrl(_)
        ));
    }

    #[test]
    fn test_plain_user_message_is_text() {
        let ChatCompletionRequestMessage::User(user) = convert_message(&Message::user("hi")) else {
            panic!("expected a user message");
        };
        assert!(matches!(
            user.content,
            ChatCompletionRequestUserMessageContent::Text(ref t) if t == "hi"
        ));
    }
}
