//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the request contract and the response validator live here.

pub mod entities;
pub mod errors;
pub mod request;
pub mod response;

pub use entities::{
    AnalysisResult, AnalysisToken, ChatMessage, ChatRole, DailyPhrase, DisplayLanguage,
    FLASHCARDS_PER_DECK, Flashcard, Level, Screen,
};
pub use errors::DomainError;
pub use request::{
    ChatSessionRequest, ChatTurn, GenerationRequest, Intent, RequestBuilder, ResponseShape,
};
