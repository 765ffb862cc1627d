use anyhow::{anyhow, Result};
use serde_json::json;

/// Fixed prefix of the user-visible failure message. Kept verbatim so the
/// surfaced text matches what users of the old web client saw.
pub const ERROR_PREFIX: &str = "An error occurred while generating the meal plan:";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Outcome of a single generation attempt. A failure carries the detail
/// text; there is no automatic retry.
#[derive(Debug, Clone)]
pub enum GenerationResult {
    Plan(String),
    Failure(String),
}

impl GenerationResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationResult::Failure(_))
    }

    /// The user-visible failure message, beginning with [`ERROR_PREFIX`].
    pub fn failure_message(&self) -> Option<String> {
        match self {
            GenerationResult::Plan(_) => None,
            GenerationResult::Failure(detail) => Some(format!("{} {}", ERROR_PREFIX, detail)),
        }
    }
}

/// Client for the Gemini generateContent endpoint. Text in, markdown text
/// out; one request per call, no streaming, no timeout beyond reqwest's own.
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        GeminiClient {
            http_client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send the prompt and return the outcome as a value: transport and
    /// service failures become `GenerationResult::Failure`, never an Err
    /// the caller has to catch.
    pub async fn generate(&self, prompt: &str) -> GenerationResult {
        match self.request(prompt).await {
            Ok(text) => GenerationResult::Plan(text),
            Err(e) => GenerationResult::Failure(e.to_string()),
        }
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request_body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error ({}): {}", status, error_text));
        }

        let response_json: serde_json::Value = response.json().await?;

        let text = response_json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Invalid Gemini response format"))?
            .to_string();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_carries_prefix() {
        let result = GenerationResult::Failure("connection reset".to_string());
        let message = result.failure_message().unwrap();
        assert!(message.starts_with(ERROR_PREFIX));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_plan_has_no_failure_message() {
        let result = GenerationResult::Plan("# Uge 36".to_string());
        assert!(!result.is_failure());
        assert!(result.failure_message().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_becomes_failure_value() {
        // Discard port; the request fails without reaching any service.
        let client = GeminiClient::new("test-key".into(), "gemini-2.5-flash".into())
            .with_base_url("http://127.0.0.1:9");

        let result = client.generate("prompt").await;
        assert!(result.is_failure());
        assert!(result
            .failure_message()
            .unwrap()
            .starts_with(ERROR_PREFIX));
    }
}
