//! Configuration types for the PPSS server.
//!
//! `PpssConfig` represents the top-level `config.toml` in the data directory.
//! Every field has a default so an empty or missing file is valid. The
//! provider API key is never read from this file; it comes from the
//! environment only.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PpssConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Explicit database URL. When absent, `{data_dir}/ppss.db` is used.
    #[serde(default)]
    pub url: Option<String>,
}

/// Chat gateway settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Chat completion model.
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Image generation model.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// OpenAI-compatible API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single gateway call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "gpt-image-1".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            image_model: default_image_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
