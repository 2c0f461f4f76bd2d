//! Chat presenter. Owns the transcript and the live tutor session.
//!
//! The session handle is lent to the in-flight turn and handed back with the
//! reply; while it is away, submission is disabled.

use crate::domain::{
    ChatMessage, ChatRole, ChatTurn, DisplayLanguage, DomainError, RequestBuilder,
};
use crate::ports::ChatSessionPort;
use crate::usecases::ticket::Ticket;
use chrono::Utc;
use tracing::{debug, warn};

pub const CHAT_APOLOGY: &str =
    "Sumimasen! I'm having trouble connecting right now. Please try again.";

/// Opening line of every fresh transcript.
pub fn greeting(language: DisplayLanguage) -> String {
    format!(
        "Konnichiwa! I am Sakura-sensei. I can explain things in {}. How can I help you today?",
        language
    )
}

enum ChatState {
    Ready(Box<dyn ChatSessionPort>),
    Awaiting(Ticket),
}

pub struct ChatPresenter {
    language: DisplayLanguage,
    transcript: Vec<ChatMessage>,
    state: ChatState,
    next_id: u64,
}

impl ChatPresenter {
    /// Mount with a freshly opened session; the transcript starts with the greeting.
    pub fn new(session: Box<dyn ChatSessionPort>) -> Self {
        let mut presenter = Self {
            language: session.language(),
            transcript: Vec::new(),
            state: ChatState::Ready(session),
            next_id: 0,
        };
        presenter.push_greeting();
        presenter
    }

    /// Replace the session and start over. Any outstanding reply becomes stale.
    pub fn reset(&mut self, session: Box<dyn ChatSessionPort>) {
        self.language = session.language();
        self.state = ChatState::Ready(session);
        self.transcript.clear();
        self.next_id = 0;
        self.push_greeting();
    }

    pub fn language(&self) -> DisplayLanguage {
        self.language
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.state, ChatState::Awaiting(_))
    }

    /// Append the learner's message and lend out the session for the turn.
    ///
    /// Returns None (and changes nothing) for blank text or while a reply is pending.
    pub fn submit(
        &mut self,
        text: &str,
        ticket: Ticket,
    ) -> Option<(Box<dyn ChatSessionPort>, ChatTurn)> {
        let turn = RequestBuilder::chat_turn(text, self.language).ok()?;
        let session = match std::mem::replace(&mut self.state, ChatState::Awaiting(ticket)) {
            ChatState::Ready(session) => session,
            awaiting @ ChatState::Awaiting(_) => {
                self.state = awaiting;
                return None;
            }
        };
        self.push(ChatRole::User, turn.text.clone());
        Some((session, turn))
    }

    /// Take the session back and append the tutor's reply (or the apology).
    /// Returns false for a stale ticket; the returned session is then dropped.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        session: Box<dyn ChatSessionPort>,
        reply: Result<String, DomainError>,
    ) -> bool {
        match self.state {
            ChatState::Awaiting(pending) if pending == ticket => {}
            _ => {
                debug!(%ticket, "discarding stale chat reply and its session");
                return false;
            }
        }
        self.state = ChatState::Ready(session);
        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "chat turn failed");
                CHAT_APOLOGY.to_string()
            }
        };
        self.push(ChatRole::Model, text);
        true
    }

    fn push_greeting(&mut self) {
        self.push(ChatRole::Model, greeting(self.language));
    }

    fn push(&mut self, role: ChatRole, text: String) {
        self.next_id += 1;
        self.transcript.push(ChatMessage {
            id: self.next_id.to_string(),
            role,
            text,
            timestamp: Utc::now().timestamp_millis(),
        });
    }
}
