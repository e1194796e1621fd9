//! The generateContent call and its failure classification.

use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use adsmith_pipeline::{GenerateError, TextGenerator};

/// Public Gemini API base.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model known for tool use and good grounding behavior.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Block anything at medium probability or above, for every category.
const SAFETY_SETTINGS: &[(&str, &str)] = &[
    ("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_HATE_SPEECH", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_SEXUALLY_EXPLICIT", "BLOCK_MEDIUM_AND_ABOVE"),
    ("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_MEDIUM_AND_ABOVE"),
];

/// Gemini API client (blocking).
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_base: String,
    api_key: String,
    model: String,
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    tools: Vec<serde_json::Value>,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    web_search_queries: Vec<String>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, api_key)
    }

    /// Point the client at a different base URL. Used by tests and
    /// proxied deployments.
    pub fn with_api_base(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("adsmith/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn call(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            tools: vec![serde_json::json!({ "google_search": {} })],
            safety_settings: SAFETY_SETTINGS
                .iter()
                .map(|(category, threshold)| SafetySetting {
                    category: category.to_string(),
                    threshold: threshold.to_string(),
                })
                .collect(),
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| GenerateError::Transient(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let code = status.as_u16();
            // 429 and 5xx are worth another attempt; everything else is a
            // request we should not repeat verbatim.
            if code == 429 || status.is_server_error() {
                return Err(GenerateError::Transient(format!("HTTP {}: {}", code, body)));
            }
            return Err(GenerateError::Failed(format!("HTTP {}: {}", code, body)));
        }

        let body: GenerateResponse = response
            .json()
            .map_err(|e| GenerateError::Failed(format!("Bad response body: {}", e)))?;

        extract_text(body)
    }
}

/// Pull the response text out, or classify why there is none.
fn extract_text(body: GenerateResponse) -> Result<String, GenerateError> {
    let candidate = body.candidates.into_iter().next();

    let text: String = candidate
        .as_ref()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(feedback) = body.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let message = feedback.block_reason_message.unwrap_or(reason);
                return Err(GenerateError::Blocked(message));
            }
        }
        if let Some(candidate) = &candidate {
            if let Some(reason) = &candidate.finish_reason {
                if reason != "STOP" {
                    return Err(GenerateError::Abnormal(reason.clone()));
                }
            }
        }
        warn!("Gemini returned an empty response with no block or finish reason");
        return Ok(String::new());
    }

    if let Some(metadata) = candidate.and_then(|c| c.grounding_metadata) {
        if !metadata.web_search_queries.is_empty() {
            info!("Grounding web search queries: {:?}", metadata.web_search_queries);
        }
    }

    Ok(text)
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self.call(prompt)
    }
}
