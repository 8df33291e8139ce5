/// Report Generator — the single point of entry for all LLM calls.
///
/// Wraps the Anthropic Messages API. Calls are single-attempt with an
/// explicit timeout: a report cannot be meaningfully produced without a model
/// response, so failures surface to the caller instead of degrading.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all report generation.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
/// Low temperature to reduce fabrication in the generated report.
const TEMPERATURE: f32 = 0.1;
const LLM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("AI analysis failed: {0}")]
    GenerationFailed(String),
}

/// Produces a Markdown report from a sector name and fetched context.
/// Object-safe so the HTTP layer can carry a mock in tests.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, sector: &str, context: &str) -> Result<String, ReportError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct LlmResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// LLM-backed report generator.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(LLM_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn call(&self, prompt: &str, system: &str) -> Result<String, ReportError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ReportError::GenerationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Surface the API's own message when the body parses as one
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ReportError::GenerationFailed(format!(
                "model backend returned status {status}: {message}"
            )));
        }

        let llm_response: LlmResponse = response
            .json()
            .await
            .map_err(|e| ReportError::GenerationFailed(e.to_string()))?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response
            .text()
            .map(str::to_string)
            .ok_or_else(|| ReportError::GenerationFailed("model returned empty content".into()))
    }
}

#[async_trait]
impl ReportGenerator for LlmClient {
    async fn generate(&self, sector: &str, context: &str) -> Result<String, ReportError> {
        let prompt = prompts::build_report_prompt(sector, context);
        self.call(&prompt, prompts::REPORT_SYSTEM).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_picks_first_text_block() {
        let response = LlmResponse {
            content: vec![
                ContentBlock {
                    block_type: "thinking".to_string(),
                    text: None,
                },
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("## Market Overview".to_string()),
                },
            ],
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };
        assert_eq!(response.text(), Some("## Market Overview"));
    }

    #[test]
    fn test_response_text_none_when_no_text_block() {
        let response = LlmResponse {
            content: vec![],
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
            },
        };
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_generation_error_carries_upstream_message() {
        let err = ReportError::GenerationFailed("connection refused".to_string());
        assert_eq!(err.to_string(), "AI analysis failed: connection refused");
    }
}
