//! Mock AI adapter for testing without API calls.
//!
//! Returns canned structured replies and records every request it sees so
//! tests can inspect what would have been sent.

use crate::domain::{
    ChatSessionRequest, DisplayLanguage, DomainError, GenerationRequest, ResponseShape,
};
use crate::ports::{ChatSessionPort, GenerativePort};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

const MOCK_DECK: &str = r#"{"cards": [
    {"kanji": "寿司", "reading": "すし", "romaji": "sushi", "translation": "sushi", "exampleSentence": "寿司が好きです。"},
    {"kanji": "水", "reading": "みず", "romaji": "mizu", "translation": "water", "exampleSentence": "水をください。"},
    {"kanji": "肉", "reading": "にく", "romaji": "niku", "translation": "meat", "exampleSentence": "肉を食べます。"},
    {"kanji": "魚", "reading": "さかな", "romaji": "sakana", "translation": "fish", "exampleSentence": "魚が新鮮です。"},
    {"kanji": "ご飯", "reading": "ごはん", "romaji": "gohan", "translation": "rice", "exampleSentence": "ご飯を炊きます。"}
]}"#;

const MOCK_ANALYSIS: &str = r#"```json
{
    "original": "私は学生です",
    "translation": "I am a student.",
    "tokens": [
        {"word": "私", "reading": "わたし", "partOfSpeech": "Pronoun", "meaning": "I"},
        {"word": "は", "reading": "は", "partOfSpeech": "Particle", "meaning": "topic marker"},
        {"word": "学生", "reading": "がくせい", "partOfSpeech": "Noun", "meaning": "student"},
        {"word": "です", "reading": "です", "partOfSpeech": "Copula", "meaning": "to be (polite)"}
    ],
    "grammarNotes": "X は Y です states that X is Y."
}
```"#;

const MOCK_PHRASE: &str = r#"{"japanese": "いただきます", "reading": "Itadakimasu", "translation": "Let's eat", "context": "Said before every meal to give thanks."}"#;

/// Everything the mock has been asked to do.
#[derive(Debug, Default)]
pub struct MockLog {
    pub requests: Vec<GenerationRequest>,
    pub sessions: Vec<DisplayLanguage>,
    pub chat_turns: Vec<(DisplayLanguage, String)>,
}

/// Mock AI adapter for testing.
///
/// Simulates network latency with a configurable delay. A failing mock
/// rejects every call, standing in for a missing key or an unreachable service.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
    failing: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockAiAdapter {
    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            failing: false,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// Create a mock adapter whose every call fails.
    pub fn failing(delay_ms: u64) -> Self {
        Self {
            failing: true,
            ..Self::with_delay(delay_ms)
        }
    }

    /// Snapshot access to the recorded calls.
    pub fn log(&self) -> MutexGuard<'_, MockLog> {
        lock(&self.log)
    }

    fn canned_reply(shape: ResponseShape) -> &'static str {
        match shape {
            ResponseShape::FlashcardSet => MOCK_DECK,
            ResponseShape::SentenceAnalysis => MOCK_ANALYSIS,
            ResponseShape::DailyPhrase => MOCK_PHRASE,
        }
    }
}

fn lock(log: &Mutex<MockLog>) -> MutexGuard<'_, MockLog> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl GenerativePort for MockAiAdapter {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        info!(
            intent = ?request.intent,
            language = %request.language,
            "[MOCK] Simulating structured generation"
        );
        lock(&self.log).requests.push(request.clone());

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if self.failing {
            return Err(DomainError::Ai("[MOCK] service unavailable".to_string()));
        }
        Ok(Self::canned_reply(request.shape).to_string())
    }

    fn start_chat(&self, request: ChatSessionRequest) -> Box<dyn ChatSessionPort> {
        lock(&self.log).sessions.push(request.language);
        Box::new(MockChatSession {
            language: request.language,
            delay_ms: self.delay_ms,
            failing: self.failing,
            turns: 0,
            log: Arc::clone(&self.log),
        })
    }
}

/// Chat session that answers every turn with a short canned reply.
pub struct MockChatSession {
    language: DisplayLanguage,
    delay_ms: u64,
    failing: bool,
    turns: usize,
    log: Arc<Mutex<MockLog>>,
}

#[async_trait::async_trait]
impl ChatSessionPort for MockChatSession {
    fn language(&self) -> DisplayLanguage {
        self.language
    }

    fn history_len(&self) -> usize {
        self.turns
    }

    async fn send_message(&mut self, text: &str) -> Result<String, DomainError> {
        lock(&self.log)
            .chat_turns
            .push((self.language, text.to_string()));

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        if self.failing {
            return Err(DomainError::Ai("[MOCK] service unavailable".to_string()));
        }
        self.turns += 2;
        Ok(format!(
            "[MOCK] いいですね！ (explained in {}): {}",
            self.language, text
        ))
    }
}
