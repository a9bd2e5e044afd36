// src/llm/client.rs
// Thin reqwest client for the Gemini generateContent API, behind the
// GenerativeProvider seam so the content adapter can be tested without a
// network.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CONFIG;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("empty or malformed payload: {0}")]
    Malformed(String),
}

/// Interface to the external generative-content provider. One text channel
/// (optionally JSON-constrained) and one image channel returning an inline
/// data URL.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, ProviderError>;

    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;
}

pub struct GeminiClient {
    client: ReqwestClient,
    api_key: String,
}

impl GeminiClient {
    pub fn new() -> Result<Self> {
        info!(
            "Initializing Gemini client: text={}, story={}, image={}",
            CONFIG.text_model, CONFIG.story_model, CONFIG.image_model
        );

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(CONFIG.request_timeout))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            api_key: CONFIG.gemini_api_key.clone(),
        })
    }

    async fn generate_content(&self, model: &str, body: Value) -> Result<Value, ProviderError> {
        let url = CONFIG.generate_url(model);
        debug!("Making request to: {}", url);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        json_mode: bool,
    ) -> Result<String, ProviderError> {
        let mut body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });
        if json_mode {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let response = self.generate_content(model, body).await?;
        extract_text(&response)
            .ok_or_else(|| ProviderError::Malformed("no text part in response".to_string()))
    }

    async fn generate_image(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self.generate_content(model, body).await?;
        extract_inline_image(&response)
            .ok_or_else(|| ProviderError::Malformed("no inline image in response".to_string()))
    }
}

fn response_parts(response: &Value) -> Option<&Vec<Value>> {
    response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
}

/// First non-empty text part of the first candidate.
pub fn extract_text(response: &Value) -> Option<String> {
    response_parts(response)?
        .iter()
        .find_map(|part| part.get("text").and_then(|t| t.as_str()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// First inline image of the first candidate, rendered as a data URL.
pub fn extract_inline_image(response: &Value) -> Option<String> {
    response_parts(response)?.iter().find_map(|part| {
        let inline = part.get("inlineData")?;
        let mime = inline.get("mimeType")?.as_str()?;
        let data = inline.get("data")?.as_str()?;
        Some(format!("data:{};base64,{}", mime, data))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_text_part() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "  hello  " },
                        { "text": "second" }
                    ]
                }
            }]
        });
        assert_eq!(extract_text(&response).as_deref(), Some("hello"));
    }

    #[test]
    fn empty_text_is_treated_as_missing() {
        let response = json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert!(extract_text(&response).is_none());
        assert!(extract_text(&json!({})).is_none());
    }

    #[test]
    fn inline_image_becomes_data_url() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "caption" },
                        { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
                    ]
                }
            }]
        });
        assert_eq!(
            extract_inline_image(&response).as_deref(),
            Some("data:image/png;base64,QUJD")
        );
    }
}
