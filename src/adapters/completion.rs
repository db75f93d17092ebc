use crate::domain::ports::Interpreter;
use crate::utils::error::{Result, TarotError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo-instruct";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Text stored for every reading when running in testing mode.
pub const PLACEHOLDER_INTERPRETATION: &str = "This is a test interpretation";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Interpreter backed by an OpenAI-style text completion endpoint.
pub struct OpenAiCompletions {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiCompletions {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: DEFAULT_COMPLETION_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Interpreter for OpenAiCompletions {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(model = %self.model, "Requesting completion from: {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Completion response status: {}", status);

        if !status.is_success() {
            return Err(TarotError::UpstreamStatusError {
                service: "completion source".to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&body)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or(TarotError::EmptyCompletionError)
    }
}

/// Offline interpreter that never leaves the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderInterpreter;

#[async_trait]
impl Interpreter for PlaceholderInterpreter {
    async fn interpret(&self, _prompt: &str) -> Result<String> {
        Ok(PLACEHOLDER_INTERPRETATION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_interpret_sends_prompt_and_returns_first_choice() {
        let server = MockServer::start();
        let completion_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/completions")
                .header("Authorization", "Bearer sk-test")
                .json_body(serde_json::json!({
                    "model": "gpt-3.5-turbo-instruct",
                    "prompt": "Read the cards",
                    "max_tokens": 250
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"text": "\n\nThe stars align.", "index": 0}]
                }));
        });

        let interpreter = OpenAiCompletions::new(
            Client::new(),
            server.url("/v1/completions"),
            "sk-test",
        )
        .with_max_tokens(250);

        let text = interpreter.interpret("Read the cards").await.unwrap();

        completion_mock.assert();
        assert_eq!(text, "\n\nThe stars align.");
    }

    #[tokio::test]
    async fn test_interpret_empty_choices() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let interpreter =
            OpenAiCompletions::new(Client::new(), server.url("/v1/completions"), "sk-test");
        let result = interpreter.interpret("Read the cards").await;

        assert!(matches!(result, Err(TarotError::EmptyCompletionError)));
    }

    #[tokio::test]
    async fn test_interpret_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/completions");
            then.status(401)
                .json_body(serde_json::json!({"error": {"message": "Incorrect API key"}}));
        });

        let interpreter =
            OpenAiCompletions::new(Client::new(), server.url("/v1/completions"), "wrong");
        let result = interpreter.interpret("Read the cards").await;

        assert!(matches!(
            result,
            Err(TarotError::UpstreamStatusError { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_placeholder_interpreter() {
        let text = PlaceholderInterpreter.interpret("anything").await.unwrap();
        assert_eq!(text, PLACEHOLDER_INTERPRETATION);
    }
}
