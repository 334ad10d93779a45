use crate::error::{RagError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;

/// One generative request: fixed sampling parameters plus the two prompt
/// roles. The response is free text to be parsed by the risk engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl GenerationRequest {
    /// Default sampling parameters for the assessment task: low temperature
    /// keeps citations stable across runs.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.15,
            max_tokens: 700,
            top_p: 0.95,
        }
    }
}

/// Black-box boundary to the generative model. Implementations must return
/// the raw completion text or an error; the caller owns the timeout.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn complete(&self, request: &GenerationRequest) -> Result<String>;
}

/// OpenAI-style chat-completions client.
pub struct HttpGenerativeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl HttpGenerativeClient {
    /// Build a client from environment configuration: `TMEP_LLM_URL`,
    /// `TMEP_LLM_API_KEY`, and optionally `TMEP_LLM_MODEL`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("TMEP_LLM_URL")
            .map_err(|_| RagError::Generative("TMEP_LLM_URL not set".to_string()))?;
        let api_key = env::var("TMEP_LLM_API_KEY")
            .map_err(|_| RagError::Generative("TMEP_LLM_API_KEY not set".to_string()))?;
        let model =
            env::var("TMEP_LLM_MODEL").unwrap_or_else(|_| "llama-3.1-8b-instant".to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

#[async_trait]
impl GenerativeClient for HttpGenerativeClient {
    async fn complete(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::Generative(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(RagError::Generative(format!(
                "generative service returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagError::Generative(format!("malformed response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RagError::Generative("empty choices in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_sampling_parameters() {
        let request = GenerationRequest::new("system", "user");
        assert_eq!(request.temperature, 0.15);
        assert_eq!(request.max_tokens, 700);
        assert_eq!(request.top_p, 0.95);
    }

    #[test]
    fn test_chat_request_serializes_roles_in_order() {
        let body = ChatRequest {
            model: "llama-3.1-8b-instant",
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "s",
                },
                ChatMessage {
                    role: "user",
                    content: "u",
                },
            ],
            temperature: 0.15,
            max_tokens: 700,
            top_p: 0.95,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 700);
    }
}
