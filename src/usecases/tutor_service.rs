//! Tutor service. Pairs the request builder with the response validator for
//! each intent and applies the per-intent failure policy.
//!
//! Daily phrases never fail (canned fallback); flashcards and analysis
//! surface their errors to the presenter.

use crate::domain::response::{
    parse_analysis, parse_chat_reply, parse_daily_phrase, parse_flashcards,
};
use crate::domain::{
    AnalysisResult, ChatTurn, DailyPhrase, DisplayLanguage, DomainError, Flashcard, Level,
    RequestBuilder,
};
use crate::ports::{ChatSessionPort, GenerativePort};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Service for every AI-backed operation the screens need.
pub struct TutorService {
    ai: Arc<dyn GenerativePort>,
}

impl TutorService {
    /// Create a new tutor service.
    ///
    /// # Arguments
    /// * `ai` - Generative port implementation (Gemini, Mock)
    pub fn new(ai: Arc<dyn GenerativePort>) -> Self {
        Self { ai }
    }

    /// Fetch the phrase of the day. Any failure yields `DailyPhrase::fallback()`.
    pub async fn daily_phrase(&self, language: DisplayLanguage) -> DailyPhrase {
        let request = RequestBuilder::daily_phrase(language);
        match self.ai.generate(&request).await {
            Ok(raw) => parse_daily_phrase(&raw),
            Err(e) => {
                warn!(error = %e, %language, "daily phrase request failed, using fallback");
                DailyPhrase::fallback()
            }
        }
    }

    /// Generate a deck of flashcards for a topic.
    pub async fn generate_flashcards(
        &self,
        topic: &str,
        level: Level,
        language: DisplayLanguage,
    ) -> Result<Vec<Flashcard>, DomainError> {
        let request = RequestBuilder::flashcard_set(topic, level, language)?;
        let result = async {
            let raw = self.ai.generate(&request).await?;
            parse_flashcards(&raw, Utc::now().timestamp_millis())
        }
        .await;

        match &result {
            Ok(cards) => info!(topic, %level, %language, cards = cards.len(), "deck generated"),
            Err(e) => error!(error = %e, topic, "error generating flashcards"),
        }
        result
    }

    /// Break a Japanese sentence into tokens with translation and grammar notes.
    pub async fn analyze_sentence(
        &self,
        sentence: &str,
        language: DisplayLanguage,
    ) -> Result<AnalysisResult, DomainError> {
        let request = RequestBuilder::sentence_analysis(sentence, language)?;
        let result = async {
            let raw = self.ai.generate(&request).await?;
            parse_analysis(&raw, sentence)
        }
        .await;

        if let Err(e) = &result {
            error!(error = %e, "error analyzing sentence");
        }
        result
    }

    /// Open a fresh tutor session for `language`.
    pub fn start_chat(&self, language: DisplayLanguage) -> Box<dyn ChatSessionPort> {
        self.ai.start_chat(RequestBuilder::chat_session(language))
    }

    /// Send one turn on `session`. Blank replies are replaced with a stock line.
    pub async fn send_chat(
        session: &mut dyn ChatSessionPort,
        turn: &ChatTurn,
    ) -> Result<String, DomainError> {
        if session.language() != turn.language {
            warn!(
                session = %session.language(),
                turn = %turn.language,
                "chat turn language differs from session"
            );
        }
        let raw = session.send_message(&turn.text).await?;
        Ok(parse_chat_reply(&raw))
    }
}
