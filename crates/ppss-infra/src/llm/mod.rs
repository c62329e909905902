//! Chat gateway construction.
//!
//! The gateway strategy is chosen once at startup: a configured API key
//! selects the live OpenAI-compatible gateway, otherwise the offline
//! placeholder is used. Callers only ever see a [`BoxChatGateway`].

pub mod openai;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use ppss_core::gateway::box_gateway::BoxChatGateway;
use ppss_core::gateway::placeholder::PlaceholderGateway;
use ppss_types::config::GatewayConfig;

use self::openai::OpenAiGateway;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Read the API key from the environment. Blank values count as unset.
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(SecretString::from)
}

/// Build the process-wide gateway from config and an optional API key.
pub fn create_gateway(config: &GatewayConfig, api_key: Option<SecretString>) -> BoxChatGateway {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    match api_key.filter(|k| !k.expose_secret().trim().is_empty()) {
        Some(key) => {
            info!(model = %config.model, base_url = %config.base_url, "Using live chat gateway");
            BoxChatGateway::new(OpenAiGateway::new(config, key)).with_timeout(timeout)
        }
        None => {
            warn!("{API_KEY_ENV} not set, using placeholder chat gateway");
            BoxChatGateway::new(PlaceholderGateway::new()).with_timeout(timeout)
        }
    }
}
