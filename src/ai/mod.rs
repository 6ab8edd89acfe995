//! AI analysis of a processed table.
//!
//! The pipeline talks to the model through the [`AnalysisClient`] trait; [`GeminiClient`] is the
//! production implementation. Every failure is classified into an [`AiError`] and replaced by a
//! fixed explanatory text, so a run never fails because of the AI step.

pub mod gemini;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::{build_prompt, grouped_markdown, rows_markdown};

use thiserror::Error;

use crate::observability::{Component, PipelineContext, PipelineEvent, Severity};
use crate::types::{GroupedRow, Table};

/// Text used in place of an analysis when no client could be created.
pub const CLIENT_UNAVAILABLE: &str = "AI analysis unavailable: Gemini client not initialized. Check installation and API key (GEMINI_API_KEY/GOOGLE_API_KEY).";

/// Classified AI failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    /// Missing, invalid or unauthorized API key.
    #[error("missing or invalid API key")]
    MissingKey,
    /// Connection failure or timeout.
    #[error("network error: {0}")]
    NetworkError(String),
    /// Rate limit or quota exhausted.
    #[error("rate limited: {0}")]
    RateLimited(String),
    /// Anything else.
    #[error("{0}")]
    Unknown(String),
}

impl AiError {
    /// Classify a free-form error message by keyword.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("api key") || lower.contains("permission") {
            Self::MissingKey
        } else if ["rate", "quota", "resource exhausted"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Self::RateLimited(message)
        } else if ["network", "connection", "timed out"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Self::NetworkError(message)
        } else {
            Self::Unknown(message)
        }
    }

    /// Classify an HTTP error status, falling back to the response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::MissingKey,
            429 => Self::RateLimited(body.to_string()),
            _ => match Self::from_message(body) {
                Self::Unknown(_) => Self::Unknown(format!("API error ({status}): {body}")),
                other => other,
            },
        }
    }

    /// Human-readable text substituted for the analysis.
    pub fn fallback_message(&self) -> String {
        match self {
            Self::MissingKey => "AI authentication error: invalid or missing API key.".to_string(),
            Self::RateLimited(_) => "AI rate limit or quota reached. Please retry later.".to_string(),
            Self::NetworkError(_) => "AI connection error: check your internet connection.".to_string(),
            Self::Unknown(msg) => format!("AI analysis failed: {msg}"),
        }
    }
}

/// Something that turns a prompt into analysis text.
pub trait AnalysisClient: Send + Sync {
    fn analyze(&self, prompt: &str) -> Result<String, AiError>;
}

/// Produce the analysis text for a processed table.
///
/// Never fails: a missing client or a client error yields the matching fallback text and a
/// `Degraded` event.
pub fn generate_analysis(
    client: Option<&dyn AnalysisClient>,
    table: &Table,
    grouped: &[GroupedRow],
    ctx: &PipelineContext,
) -> String {
    let Some(client) = client else {
        degraded(ctx, CLIENT_UNAVAILABLE.to_string());
        return CLIENT_UNAVAILABLE.to_string();
    };

    let prompt = build_prompt(table, grouped);
    match client.analyze(&prompt) {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            degraded(ctx, e.to_string());
            e.fallback_message()
        }
    }
}

fn degraded(ctx: &PipelineContext, message: String) {
    ctx.emit(PipelineEvent::Degraded {
        component: Component::Ai,
        severity: Severity::Warning,
        message,
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::{generate_analysis, AiError, AnalysisClient, CLIENT_UNAVAILABLE};
    use crate::observability::PipelineContext;
    use crate::types::{GroupedRow, Schema, Table, Value};

    struct Stub {
        reply: Result<String, AiError>,
        prompts: Mutex<Vec<String>>,
    }

    impl AnalysisClient for Stub {
        fn analyze(&self, prompt: &str) -> Result<String, AiError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    fn inputs() -> (Table, Vec<GroupedRow>) {
        let t = Table::new(Schema::from_names(["product"]), vec![vec![Value::text("pen")]]);
        let g = vec![GroupedRow {
            group_key: Value::text("pen"),
            total_sales: 1.0,
            avg_total: 1.0,
            count_rows: 1,
        }];
        (t, g)
    }

    #[test]
    fn messages_classify_by_keyword() {
        assert_eq!(AiError::from_message("API key not valid"), AiError::MissingKey);
        assert!(matches!(AiError::from_message("Quota exceeded"), AiError::RateLimited(_)));
        assert!(matches!(AiError::from_message("operation timed out"), AiError::NetworkError(_)));
        assert!(matches!(AiError::from_message("boom"), AiError::Unknown(_)));
    }

    #[test]
    fn statuses_classify() {
        assert_eq!(AiError::from_status(403, ""), AiError::MissingKey);
        assert!(matches!(AiError::from_status(429, ""), AiError::RateLimited(_)));
        assert_eq!(
            AiError::from_status(500, "oops"),
            AiError::Unknown("API error (500): oops".to_string())
        );
    }

    #[test]
    fn fallback_texts() {
        assert_eq!(
            AiError::MissingKey.fallback_message(),
            "AI authentication error: invalid or missing API key."
        );
        assert_eq!(
            AiError::Unknown("x".into()).fallback_message(),
            "AI analysis failed: x"
        );
    }

    #[test]
    fn successful_reply_is_trimmed_and_prompt_carries_data() {
        let stub = Stub {
            reply: Ok("  insight \n".to_string()),
            prompts: Mutex::new(Vec::new()),
        };
        let (t, g) = inputs();
        let text = generate_analysis(Some(&stub as &dyn AnalysisClient), &t, &g, &PipelineContext::default());
        assert_eq!(text, "insight");
        assert!(stub.prompts.lock().unwrap()[0].contains("| pen |"));
    }

    #[test]
    fn failures_become_fallback_text() {
        let stub = Stub {
            reply: Err(AiError::RateLimited("429".into())),
            prompts: Mutex::new(Vec::new()),
        };
        let (t, g) = inputs();
        let ctx = PipelineContext::default();
        assert_eq!(
            generate_analysis(Some(&stub as &dyn AnalysisClient), &t, &g, &ctx),
            "AI rate limit or quota reached. Please retry later."
        );
        assert_eq!(generate_analysis(None, &t, &g, &ctx), CLIENT_UNAVAILABLE);
    }
}
