//! Gemini adapter for structured generation and chat.
//!
//! Talks to the `generateContent` REST endpoint. Implements `GenerativePort`
//! for one-shot requests and hands out `GeminiChatSession`s that keep the
//! conversation history client-side.

use crate::domain::response::parse_chat_reply;
use crate::domain::{ChatSessionRequest, DisplayLanguage, DomainError, GenerationRequest};
use crate::ports::{ChatSessionPort, GenerativePort};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Shared HTTP plumbing for one-shot calls and chat sessions.
#[derive(Clone)]
struct GeminiTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTransport {
    async fn generate_content(
        &self,
        body: &GenerateContentRequest<'_>,
    ) -> Result<String, DomainError> {
        if self.api_key.trim().is_empty() {
            return Err(DomainError::NotConfigured("SAKURA_API_KEY"));
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let text = parsed.text();
        debug!(raw_len = text.len(), "received Gemini response");
        Ok(text)
    }
}

/// Gemini `generateContent` adapter.
pub struct GeminiAdapter {
    transport: GeminiTransport,
    model: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `api_url` - API base (e.g., "https://generativelanguage.googleapis.com/v1beta")
    /// * `api_key` - API key; empty makes every call fail with `NotConfigured`
    /// * `model` - Model name (e.g., "gemini-2.5-flash")
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        let endpoint = format!(
            "{}/models/{}:generateContent",
            api_url.trim_end_matches('/'),
            model
        );
        Self {
            transport: GeminiTransport {
                client: reqwest::Client::new(),
                endpoint,
                api_key,
            },
            model,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.transport.endpoint
    }

    fn request_body(
        request: &GenerationRequest,
    ) -> (Vec<Content>, Option<Content>, GenerationConfig) {
        let contents = vec![Content::text(Some("user"), &request.prompt)];
        let system = request
            .system_instruction
            .as_deref()
            .map(|s| Content::text(None, s));
        let config = GenerationConfig {
            response_mime_type: "application/json",
            response_schema: request.shape.schema(),
        };
        (contents, system, config)
    }
}

#[async_trait::async_trait]
impl GenerativePort for GeminiAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        info!(
            intent = ?request.intent,
            language = %request.language,
            model = %self.model,
            "sending structured generation request"
        );
        let (contents, system_instruction, config) = Self::request_body(request);
        let body = GenerateContentRequest {
            contents: &contents,
            system_instruction,
            generation_config: Some(config),
        };
        self.transport.generate_content(&body).await
    }

    fn start_chat(&self, request: ChatSessionRequest) -> Box<dyn ChatSessionPort> {
        info!(language = %request.language, "opening chat session");
        Box::new(GeminiChatSession {
            transport: self.transport.clone(),
            language: request.language,
            system_instruction: Content::text(None, &request.system_instruction),
            history: Vec::new(),
        })
    }
}

/// Chat session. Replays the accumulated history on every turn.
pub struct GeminiChatSession {
    transport: GeminiTransport,
    language: DisplayLanguage,
    system_instruction: Content,
    history: Vec<Content>,
}

#[async_trait::async_trait]
impl ChatSessionPort for GeminiChatSession {
    fn language(&self) -> DisplayLanguage {
        self.language
    }

    fn history_len(&self) -> usize {
        self.history.len()
    }

    async fn send_message(&mut self, text: &str) -> Result<String, DomainError> {
        let user_turn = Content::text(Some("user"), text);
        let mut contents = self.history.clone();
        contents.push(user_turn.clone());

        let body = GenerateContentRequest {
            contents: &contents,
            system_instruction: Some(self.system_instruction.clone()),
            generation_config: None,
        };
        let reply = self.transport.generate_content(&body).await?;

        // History only grows on success.
        self.record_turn(user_turn, &reply);
        debug!(turns = self.history.len(), "chat turn complete");
        Ok(reply)
    }
}

impl GeminiChatSession {
    /// Gemini rejects empty text parts, so a blank reply (e.g. a safety
    /// block) is stored as the same stock line the learner sees.
    fn record_turn(&mut self, user_turn: Content, reply: &str) {
        self.history.push(user_turn);
        self.history
            .push(Content::text(Some("model"), &parse_chat_reply(reply)));
    }
}

/// Gemini request body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

/// Gemini response structure.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate; empty when there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect::<String>())
            .unwrap_or_default()
    }
}
