//! Gemini API client for smart replies
//!
//! Uses synchronous HTTP (ureq) to be executor-agnostic.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{SmartReplyProvider, clean_suggestions};
use crate::config::SmartReplyCredentials;
use crate::models::Message;

const TEMPERATURE: f32 = 0.5;
const MAX_OUTPUT_TOKENS: u32 = 100;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

/// Smart-reply provider backed by the Gemini `generateContent` endpoint
pub struct GeminiClient {
    credentials: SmartReplyCredentials,
}

impl GeminiClient {
    /// Gemini API base URL
    const BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(credentials: SmartReplyCredentials) -> Self {
        Self { credentials }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", Self::BASE_URL, self.credentials.model)
    }
}

/// Prompt asking for three short replies to `message`
pub(crate) fn build_prompt(message: &Message) -> String {
    format!(
        "Based on the following email, generate 3 short, distinct, and context-aware reply suggestions.\n\
         Each reply should be a concise phrase or a short sentence, suitable for a \"smart reply\" button.\n\
         Do not add any preamble or explanation. Just return the three suggestions.\n\
         If the email is a notification or doesn't warrant a reply, suggest neutral acknowledgements.\n\
         \n\
         --- EMAIL ---\n\
         From: {}\n\
         Subject: {}\n\
         \n\
         Body:\n\
         {}\n\
         --- END EMAIL ---\n\
         \n\
         SUGGESTED REPLIES:\n",
        message.from, message.subject, message.body
    )
}

impl SmartReplyProvider for GeminiClient {
    fn generate(&self, message: &Message) -> Result<Vec<String>> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(build_prompt(message)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let mut response = ureq::post(&self.endpoint())
            .header("x-goog-api-key", &self.credentials.api_key)
            .send_json(&request)
            .context("Failed to send smart reply request")?;

        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .context("Failed to parse smart reply response")?;

        let text = parsed.text().context("Smart reply response had no candidates")?;
        Ok(clean_suggestions(&text))
    }
}
