//! Fallback backend: Gemini generateContent with structured output.
//!
//! The request declares a response schema, so the provider itself constrains
//! the generated text to the two-field verdict shape. Validation still happens
//! in the classifier like it does for the primary backend.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::backend::Backend;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    url: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl GeminiBackend {
    pub fn from_env(
        model: &str,
        temperature: f64,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY not set"))?;

        Ok(Self {
            client: Client::new(),
            api_key,
            url: format!("{}/{}:generateContent", GEMINI_API_BASE, model),
            temperature,
            max_tokens,
            timeout,
        })
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

fn verdict_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "is_spam": { "type": "BOOLEAN" },
            "reason": { "type": "STRING" }
        },
        "required": ["is_spam", "reason"]
    })
}

#[async_trait]
impl Backend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let api_request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
                response_mime_type: "application/json",
                response_schema: verdict_schema(),
            },
        };

        // Key goes in a header, not the query string, so it cannot end up in
        // an error message that embeds the URL.
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error: {} - {}", status, body);
        }

        let api_response: GeminiResponse = response.json().await?;

        if let Some(error) = api_response.error {
            anyhow::bail!("Gemini error: {}", error.message);
        }

        api_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| anyhow::anyhow!("Gemini response contained no text part"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_config_requests_structured_output() {
        let config = GeminiGenerationConfig {
            temperature: 0.2,
            max_output_tokens: 250,
            response_mime_type: "application/json",
            response_schema: verdict_schema(),
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["responseMimeType"], "application/json");
        assert_eq!(value["maxOutputTokens"], 250);
        assert_eq!(
            value["responseSchema"]["required"],
            json!(["is_spam", "reason"])
        );
        assert_eq!(
            value["responseSchema"]["properties"]["is_spam"]["type"],
            "BOOLEAN"
        );
    }

    #[test]
    fn response_text_extraction_handles_missing_candidates() {
        let api_response: GeminiResponse = serde_json::from_str("{}").unwrap();
        let text = api_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text);
        assert!(text.is_none());
    }
}
