use super::NarrativeService;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Generative Language API
#[derive(Clone)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl NarrativeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        NarrativeConfig {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim_start_matches("models/");
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            model
        )
    }
}

impl fmt::Debug for NarrativeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrativeConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Blocking client for the `generateContent` endpoint
pub struct GeminiClient {
    agent: ureq::Agent,
    config: NarrativeConfig,
}

impl GeminiClient {
    pub fn new(config: NarrativeConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        GeminiClient { agent, config }
    }
}

impl NarrativeService for GeminiClient {
    fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.config.endpoint();
        log::debug!("POST {}", url);

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };
        let response = self
            .agent
            .post(&url)
            .set("x-goog-api-key", &self.config.api_key)
            .send_json(&request)
            .map_err(request_error)?;

        let body: GenerateContentResponse = response.into_json().map_err(|e| {
            Error::NarrativeService(format!("unreadable response from {}: {}", self.config.model, e))
        })?;
        body.into_text()
    }
}

fn request_error(err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let detail: String = body.chars().take(300).collect();
            Error::NarrativeService(format!("service returned HTTP {}: {}", code, detail.trim()))
        }
        ureq::Error::Transport(transport) => {
            Error::NarrativeService(format!("request failed: {}", transport))
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, joined
    fn into_text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }
        match self.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(Error::NarrativeService(format!(
                "prompt was blocked: {}",
                reason
            ))),
            None => Err(Error::NarrativeService(
                "response contained no text".to_string(),
            )),
        }
    }
}
