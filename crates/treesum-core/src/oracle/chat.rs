//! OpenAI-compatible chat-completions oracle (OpenRouter by default)

use serde::{Deserialize, Serialize};

use super::{build_prompt, OracleError, SummarizationOracle};
use crate::config::OracleConfig;
use crate::error::Result;

/// Blocking chat-completions client used as the summarization oracle
pub struct ChatCompletionsOracle {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    user_agent: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
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
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsOracle {
    /// Build a client from validated configuration.
    ///
    /// Fails with a configuration error when the API key or model is
    /// missing, before any request is made.
    pub fn from_config(config: &OracleConfig) -> Result<Self> {
        let (api_key, model) = config.validate()?;

        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .http_status_as_error(false)
            .build()
            .into();

        Ok(Self {
            agent,
            endpoint: chat_endpoint(&config.base_url),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            user_agent: format!(
                "treesum/{} ({})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS
            ),
        })
    }

    /// Full URL requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model requests are made against
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl SummarizationOracle for ChatCompletionsOracle {
    fn summarize(&self, content: &str, context: &str) -> std::result::Result<String, OracleError> {
        let prompt = build_prompt(content, context);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("User-Agent", &self.user_agent)
            .send_json(&request)
            .map_err(|e| OracleError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(OracleError::Status(status));
        }

        let body: ChatResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        extract_summary(body)
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim().trim_end_matches('/'))
}

fn extract_summary(response: ChatResponse) -> std::result::Result<String, OracleError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| OracleError::Malformed("no choices in response".to_string()))?;

    let summary = choice.message.content.unwrap_or_default();
    let summary = summary.trim();
    if summary.is_empty() {
        Err(OracleError::Empty)
    } else {
        Ok(summary.to_string())
    }
}
