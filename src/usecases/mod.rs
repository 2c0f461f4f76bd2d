//! Application use cases. Orchestrate domain logic via ports.
//!
//! `TutorService` runs the remote intents; the presenters hold per-screen
//! state; `AppController` ties them to navigation and the display language.

pub mod analyzer;
pub mod chat;
pub mod dashboard;
pub mod flashcards;
pub mod navigation;
pub mod ticket;
pub mod tutor_service;

pub use analyzer::AnalyzerPresenter;
pub use chat::ChatPresenter;
pub use dashboard::DashboardPresenter;
pub use flashcards::{CardFace, Deck, FlashcardMode, FlashcardsPresenter, Practice};
pub use navigation::{AppController, Completion, MountedScreen, Outcome};
pub use ticket::{Ticket, TicketCounter};
pub use tutor_service::TutorService;
