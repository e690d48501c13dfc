use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::GenerationError;
use crate::config::{ConfigError, OpenAiConfig};

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 4095;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Completion provider resolved once at startup. One variant per endpoint
/// dialect; adding a provider means adding a variant and its match arms.
#[derive(Debug)]
pub enum Provider {
    Standard {
        http: Client,
        api_key: String,
        model: String,
    },
    Regional {
        http: Client,
        api_key: String,
        model: String,
        endpoint: String,
        api_version: String,
    },
}

impl Provider {
    pub fn from_config(settings: &OpenAiConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create HTTP client");
        let api_key = settings.api_key.trim().to_string();
        let model = settings.model.trim().to_string();

        match settings.kind.trim().to_lowercase().as_str() {
            "azure" => {
                let endpoint = settings
                    .azure_endpoint
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::IncompleteAzure)?
                    .trim_end_matches('/')
                    .to_string();
                let api_version = settings
                    .azure_apiversion
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or(ConfigError::IncompleteAzure)?
                    .to_string();

                Ok(Provider::Regional {
                    http,
                    api_key,
                    model,
                    endpoint,
                    api_version,
                })
            }
            _ => Ok(Provider::Standard {
                http,
                api_key,
                model,
            }),
        }
    }

    pub async fn submit(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let response = match self {
            Provider::Standard {
                http,
                api_key,
                model,
            } => {
                http.post(self.completion_url())
                    .bearer_auth(api_key)
                    .json(&ChatRequest::new(model, system, user))
                    .send()
                    .await?
            }
            Provider::Regional {
                http,
                api_key,
                model,
                ..
            } => {
                http.post(self.completion_url())
                    .header("api-key", api_key)
                    .json(&ChatRequest::new(model, system, user))
                    .send()
                    .await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::NoChoices)
    }

    fn completion_url(&self) -> String {
        match self {
            Provider::Standard { .. } => OPENAI_CHAT_URL.to_string(),
            Provider::Regional {
                endpoint,
                model,
                api_version,
                ..
            } => format!(
                "{endpoint}/openai/deployments/{model}/chat/completions?api-version={api_version}"
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, system: &'a str, user: &'a str) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 1.0,
            max_tokens: MAX_TOKENS,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
