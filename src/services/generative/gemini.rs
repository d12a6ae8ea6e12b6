use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};

use crate::services::generative::{GenerationError, TextGenerator};

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

/// Pulls the first candidate's text out of a `generateContent` response
fn extract_text(response: &Value) -> Option<String> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("Generation API error")
                .to_string();
            return Err(GenerationError::Status { status, message });
        }

        let body: Value = response.json().await?;
        extract_text(&body).ok_or(GenerationError::EmptyResponse)
    }
}
