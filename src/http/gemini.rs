use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::constants::{GEMINI_API_VERSION, GEMINI_GENERATE_ACTION, HEADER_GEMINI_API_KEY};
use crate::error::HandlerError;
use crate::http::error::map_reqwest_error;
use crate::logging::log_handler_io;

/// Finish reasons for which the SDKs refuse to hand out candidate text.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// One generation call: system instruction plus the content to answer.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub system_instruction: &'a str,
    pub content: &'a str,
}

/// Remote model that turns a [`GenerateRequest`] into text.
pub trait GenerativeModel: Send + Sync {
    fn generate_content(
        &self,
        request: GenerateRequest<'_>,
    ) -> impl Future<Output = Result<String, HandlerError>> + Send;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBody<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentBody<'a> {
    pub fn new(system_instruction: &'a str, content: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: content }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub fn text(&self) -> Result<String, HandlerError> {
        let Some(candidate) = self.candidates.first() else {
            if let Some(reason) = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref())
            {
                return Err(HandlerError::upstream(&format!(
                    "Text not available. Response was blocked due to {}",
                    reason
                )));
            }
            return Ok(String::new());
        };

        if let Some(reason) = candidate.finish_reason.as_deref()
            && BLOCKED_FINISH_REASONS.contains(&reason)
        {
            return Err(HandlerError::upstream(&format!(
                "Candidate was blocked due to {}",
                reason
            )));
        }

        Ok(candidate
            .content
            .iter()
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// `generateContent` over the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn endpoint_url(&self, model: &str) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url, GEMINI_API_VERSION, model, GEMINI_GENERATE_ACTION
        )
    }
}

impl GenerativeModel for GeminiClient {
    async fn generate_content(&self, request: GenerateRequest<'_>) -> Result<String, HandlerError> {
        let url = self.endpoint_url(request.model);
        let body = GenerateContentBody::new(request.system_instruction, request.content);

        let response = self
            .client
            .post(&url)
            .header(HEADER_GEMINI_API_KEY, request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let raw = response.text().await.map_err(map_reqwest_error)?;
        log_handler_io("gemini response", &raw);

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .ok()
                .filter(|message| !message.is_empty())
                .unwrap_or(raw);
            return Err(HandlerError::upstream(&format!(
                "Gemini API error ({}): {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            HandlerError::upstream(&format!("invalid JSON from Gemini: {}", e))
        })?;
        parsed.text()
    }
}
