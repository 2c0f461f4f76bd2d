//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{ChatSessionRequest, DisplayLanguage, DomainError, GenerationRequest};

/// Locale used for every spoken string.
pub const JAPANESE_LOCALE: &str = "ja-JP";

/// Generative text service. Produces raw reply text; validation happens in the domain.
#[async_trait::async_trait]
pub trait GenerativePort: Send + Sync {
    /// Run a one-shot structured generation. Returns the reply body as text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, DomainError>;

    /// Open a new stateful chat session. Does not contact the service.
    fn start_chat(&self, request: ChatSessionRequest) -> Box<dyn ChatSessionPort>;
}

/// Opaque stateful chat handle bound to one display language.
///
/// History accumulates inside the handle; replacing the handle forgets it.
#[async_trait::async_trait]
pub trait ChatSessionPort: Send + Sync {
    fn language(&self) -> DisplayLanguage;

    /// Number of turns (user and model) recorded so far.
    fn history_len(&self) -> usize;

    /// Send one learner turn and return the tutor's reply text.
    async fn send_message(&mut self, text: &str) -> Result<String, DomainError>;
}

/// Text-to-speech. Fire-and-forget: nothing is returned to the caller.
pub trait SpeechPort: Send + Sync {
    fn speak(&self, text: &str, locale: &str);
}
