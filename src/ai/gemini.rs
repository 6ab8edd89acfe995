//! Gemini `generateContent` client.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AiError, AnalysisClient};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Default settings with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the key from `GEMINI_API_KEY`, else `GOOGLE_API_KEY`; `GEMINI_BASE_URL` overrides the
    /// endpoint.
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .filter_map(|k| env::var(k).ok())
            .find(|v| !v.trim().is_empty())
            .ok_or(AiError::MissingKey)?;
        let mut config = Self::new(api_key.trim());
        if let Ok(base) = env::var("GEMINI_BASE_URL") {
            if !base.trim().is_empty() {
                config.base_url = base.trim().to_string();
            }
        }
        Ok(config)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model.trim(),
            self.api_key
        )
    }
}

/// Blocking Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Unknown(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Client configured from the environment.
    pub fn from_env() -> Result<Self, AiError> {
        Self::new(GeminiConfig::from_env()?)
    }
}

fn transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() || e.is_connect() {
        AiError::NetworkError(e.without_url().to_string())
    } else {
        AiError::from_message(e.without_url().to_string())
    }
}

fn response_text(body: GeminiResponse) -> Option<String> {
    let parts = body.candidates.into_iter().next()?.content?.parts;
    let text: String = parts.into_iter().map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}

impl AnalysisClient for GeminiClient {
    fn analyze(&self, prompt: &str) -> Result<String, AiError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        tracing::info!(target: "data_ai_automator", model = %self.config.model, "AI processing started");
        let response = self
            .http
            .post(self.config.endpoint())
            .json(&body)
            .send()
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(AiError::from_status(status.as_u16(), &text));
        }

        let parsed: GeminiResponse = response.json().map_err(transport_error)?;
        response_text(parsed).ok_or_else(|| AiError::Unknown("empty response from model".to_string()))
    }
}
