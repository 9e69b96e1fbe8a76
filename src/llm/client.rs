use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::prompts::{load_prompt_file, ANALYSIS_PROMPT};
use crate::models::NormalizedAnalysis;
use crate::normalize::normalize;

/// Failures talking to the model server
#[derive(Debug, Error)]
pub enum ModelError {
    /// The server could not be reached or did not answer in time
    #[error("model server unavailable at {endpoint}: {source}")]
    Unavailable {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status
    #[error("model server error: {status} - {body}")]
    Api { status: u16, body: String },
    /// The server answered but no text could be recovered
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}

/// Configuration for the vision model client
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// Base URL of the model server (e.g., "http://localhost:11434")
    pub endpoint: String,
    /// Model to use (e.g., "llava")
    pub model: String,
    /// Prompt sent with every image
    pub system_prompt: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llava".to_string(),
            system_prompt: ANALYSIS_PROMPT.to_string(),
            temperature: 0.1,
            timeout: Duration::from_secs(120),
        }
    }
}

impl VisionConfig {
    /// Create config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("VISION_DIGEST_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var("VISION_DIGEST_MODEL") {
            config.model = model;
        }
        config
    }

    /// Replace the prompt with the contents of a file
    pub fn with_prompt_file(mut self, path: &Path) -> anyhow::Result<Self> {
        self.system_prompt = load_prompt_file(path)?;
        Ok(self)
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint.trim_end_matches('/'))
    }
}

/// Client for a locally running vision-language-model server
pub struct VisionClient {
    client: Client,
    config: VisionConfig,
}

impl VisionClient {
    pub fn new(config: VisionConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client ({}), using defaults without timeout", e);
                Client::new()
            });
        Self { client, config }
    }

    /// Send an image to the model and return its raw text answer
    pub async fn analyze_image(&self, image: &[u8]) -> Result<String, ModelError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &self.config.system_prompt,
            images: vec![STANDARD.encode(image)],
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let url = self.config.generate_url();
        info!("Sending {} byte image to {} ({})", image.len(), url, self.config.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ModelError::Unavailable {
                endpoint: self.config.endpoint.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let text = extract_response_text(&body)
            .ok_or_else(|| ModelError::InvalidResponse("no text in response".to_string()))?;
        debug!("Model returned {} chars", text.len());

        Ok(text)
    }

    /// Send an image and normalize whatever the model says about it
    pub async fn analyze_and_normalize(
        &self,
        image: &[u8],
    ) -> Result<NormalizedAnalysis, ModelError> {
        let text = self.analyze_image(image).await?;
        Ok(normalize(&text))
    }
}

/// Recover the answer text from a model server response.
///
/// Accepts a generate-style `{"response": ...}`, a chat-style
/// `{"message": {"content": ...}}`, or a bare JSON string.
pub fn extract_response_text(body: &Value) -> Option<String> {
    if let Some(text) = body.as_str() {
        return Some(text.to_string());
    }
    body.get("response")
        .and_then(Value::as_str)
        .or_else(|| body.pointer("/message/content").and_then(Value::as_str))
        .map(str::to_string)
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
}
