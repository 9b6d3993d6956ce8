use serde::Deserialize;
use serde_json::{Value, json};

use crate::augment::error::AugmentError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Placeholder shipped in sample configs; never a real key.
const PLACEHOLDER_KEY: &str = "GEMINI_API_KEY";

/// One prompt in, one block of generated text out.
pub trait TextInference {
    fn infer_text(&self, prompt: &str) -> Result<String, AugmentError>;
}

// ============================================================================
// Gemini backend
// ============================================================================

/// Hosted text model reached through the `generateContent` REST endpoint.
///
/// Single blocking request: no retry, no timeout beyond the HTTP client's own.
pub struct GeminiBackend {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl Default for GeminiBackend {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Deserialize)]
struct GenerateCandidate {
    #[serde(default)]
    content: Option<GenerateContent>,
}

#[derive(Deserialize)]
struct GenerateContent {
    #[serde(default)]
    parts: Vec<GeneratePart>,
}

#[derive(Deserialize)]
struct GeneratePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        is_api_key_configured(&self.api_key)
    }

    /// `{base_url}/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl TextInference for GeminiBackend {
    fn infer_text(&self, prompt: &str) -> Result<String, AugmentError> {
        if !self.is_configured() {
            return Err(AugmentError::NotConfigured);
        }

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&generate_request_body(prompt))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(AugmentError::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_generated_text(&body)
    }
}

/// True when `key` is non-blank and not the sample placeholder.
pub fn is_api_key_configured(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_KEY
}

/// `{"contents":[{"parts":[{"text": prompt}]}]}`
pub fn generate_request_body(prompt: &str) -> Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ]
    })
}

/// Text of the first part of the first candidate.
pub fn extract_generated_text(body: &str) -> Result<String, AugmentError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| AugmentError::MalformedBody {
            context: "generateContent response".into(),
            source: e,
        })?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(AugmentError::EmptyResponse)
}

// ============================================================================
// Mock backend (for testing without network)
// ============================================================================

pub struct MockTextInference {
    pub response: String,
}

impl TextInference for MockTextInference {
    fn infer_text(&self, _prompt: &str) -> Result<String, AugmentError> {
        Ok(self.response.clone())
    }
}
