//! Image generation over the OpenAI-compatible `/images/generations` endpoint.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use ppss_types::gateway::GatewayError;

const IMAGE_COUNT: u8 = 2;
const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

impl ImageDatum {
    /// Hosted URL, else an inline PNG data URL.
    fn into_link(self) -> Option<String> {
        self.url
            .filter(|u| !u.is_empty())
            .or_else(|| {
                self.b64_json
                    .filter(|b| !b.is_empty())
                    .map(|b| format!("data:image/png;base64,{b}"))
            })
    }
}

/// The API key is held as a [`SecretString`] and only exposed in the
/// `Authorization` header.
pub struct ImageClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl ImageClient {
    pub fn new(base_url: &str, model: &str, api_key: SecretString) -> Self {
        // The gateway wrapper enforces the real deadline; this only stops
        // sockets from lingering after it fires.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn url(&self) -> String {
        format!("{}/images/generations", self.base_url)
    }

    /// Request two images for `prompt`.
    ///
    /// A successful response without usable links yields `[""]` so callers
    /// always receive at least one entry.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<String>, GatewayError> {
        let body = ImageRequest {
            model: &self.model,
            prompt,
            n: IMAGE_COUNT,
            size: IMAGE_SIZE,
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => GatewayError::AuthenticationFailed,
                429 => GatewayError::RateLimited,
                400 => GatewayError::InvalidRequest(error_body),
                _ => GatewayError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(collect_links(parsed))
    }
}

fn collect_links(response: ImageResponse) -> Vec<String> {
    let links: Vec<String> = response
        .data
        .into_iter()
        .filter_map(ImageDatum::into_link)
        .collect();
    if links.is_empty() {
        vec![String::new()]
    } else {
        links
    }
}
