//! Flashcards presenter.
//!
//! Two modes: `Setup` (pick topic and level, generate) and `Practice` (walk a
//! deck). A `Deck` is never empty, so Practice always has a current card.

use crate::domain::{DomainError, FLASHCARDS_PER_DECK, Flashcard, Level};
use crate::usecases::ticket::Ticket;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause between turning a card face-down and showing the next one.
pub const FLIP_RESET_DELAY: Duration = Duration::from_millis(150);

pub const GENERATION_FAILED_ALERT: &str =
    "Failed to generate cards. Please check your API key and try again.";

/// A generated batch of cards. Non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(cards: Vec<Flashcard>) -> Result<Self, DomainError> {
        if cards.is_empty() {
            return Err(DomainError::InvalidResponse("empty deck".into()));
        }
        if cards.len() != FLASHCARDS_PER_DECK {
            warn!(cards = cards.len(), "deck size differs from {}", FLASHCARDS_PER_DECK);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

/// Position inside a deck. `index` is always in `[0, deck.len() - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Practice {
    deck: Deck,
    index: usize,
    face: CardFace,
}

impl Practice {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            index: 0,
            face: CardFace::Front,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn current(&self) -> &Flashcard {
        &self.deck.cards[self.index]
    }

    /// 1-based position and deck size, e.g. `(2, 5)`.
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.deck.len())
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.deck.len()
    }

    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    pub fn flip(&mut self) {
        self.face = match self.face {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        };
    }

    /// Advance one card. Returns false (and changes nothing) at the last card.
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.face = CardFace::Front;
        self.index += 1;
        true
    }

    /// Go back one card. Returns false (and changes nothing) at the first card.
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.face = CardFace::Front;
        self.index -= 1;
        true
    }

    pub fn restart(&mut self) {
        self.face = CardFace::Front;
        self.index = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashcardMode {
    Setup { generating: Option<Ticket> },
    Practice(Practice),
}

/// What the controller needs to run a generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateJob {
    pub topic: String,
    pub level: Level,
}

#[derive(Debug)]
pub struct FlashcardsPresenter {
    topic: String,
    level: Level,
    mode: FlashcardMode,
    alert: Option<String>,
}

impl Default for FlashcardsPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardsPresenter {
    pub fn new() -> Self {
        Self {
            topic: String::new(),
            level: Level::default(),
            mode: FlashcardMode::Setup { generating: None },
            alert: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn set_topic(&mut self, topic: &str) {
        self.topic = topic.to_string();
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    pub fn mode(&self) -> &FlashcardMode {
        &self.mode
    }

    pub fn practice(&self) -> Option<&Practice> {
        match &self.mode {
            FlashcardMode::Practice(p) => Some(p),
            FlashcardMode::Setup { .. } => None,
        }
    }

    pub fn practice_mut(&mut self) -> Option<&mut Practice> {
        match &mut self.mode {
            FlashcardMode::Practice(p) => Some(p),
            FlashcardMode::Setup { .. } => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.mode,
            FlashcardMode::Setup {
                generating: Some(_)
            }
        )
    }

    /// Start generating a deck. Refused outside Setup, while a generation is
    /// outstanding, or when the topic is blank.
    pub fn begin_generate(&mut self, ticket: Ticket) -> Option<GenerateJob> {
        let idle = matches!(self.mode, FlashcardMode::Setup { generating: None });
        if !idle || self.topic.trim().is_empty() {
            return None;
        }
        self.mode = FlashcardMode::Setup {
            generating: Some(ticket),
        };
        Some(GenerateJob {
            topic: self.topic.trim().to_string(),
            level: self.level,
        })
    }

    /// Apply a generation outcome. Success enters Practice at the first card;
    /// failure stays in Setup and raises the alert.
    pub fn complete_generate(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<Flashcard>, DomainError>,
    ) -> bool {
        if self.mode != (FlashcardMode::Setup { generating: Some(ticket) }) {
            debug!(%ticket, "ignoring stale flashcard generation");
            return false;
        }
        match outcome.and_then(Deck::new) {
            Ok(deck) => self.mode = FlashcardMode::Practice(Practice::new(deck)),
            Err(e) => {
                warn!(error = %e, "flashcard generation failed");
                self.mode = FlashcardMode::Setup { generating: None };
                self.alert = Some(GENERATION_FAILED_ALERT.to_string());
            }
        }
        true
    }

    /// Leave Practice and discard the deck.
    pub fn back_to_setup(&mut self) {
        if let FlashcardMode::Practice(_) = self.mode {
            self.mode = FlashcardMode::Setup { generating: None };
        }
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Take the pending alert; the UI shows it once and blocks until acknowledged.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::ticket::TicketCounter;

    fn cards(n: usize) -> Vec<Flashcard> {
        (0..n)
            .map(|i| Flashcard {
                id: format!("card-0-{}", i),
                kanji: format!("字{}", i),
                reading: "じ".into(),
                romaji: "ji".into(),
                translation: "character".into(),
                example_sentence: "字を書きます。".into(),
            })
            .collect()
    }

    fn practicing() -> FlashcardsPresenter {
        let mut tickets = TicketCounter::default();
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("Food");
        let ticket = tickets.issue();
        assert!(presenter.begin_generate(ticket).is_some());
        assert!(presenter.complete_generate(ticket, Ok(cards(FLASHCARDS_PER_DECK))));
        presenter
    }

    #[test]
    fn test_deck_rejects_empty() {
        assert!(Deck::new(Vec::new()).is_err());
        assert_eq!(Deck::new(cards(5)).unwrap().len(), 5);
    }

    #[test]
    fn test_blank_topic_is_refused() {
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("   ");
        assert!(presenter.begin_generate(TicketCounter::default().issue()).is_none());
        assert!(!presenter.is_loading());
    }

    #[test]
    fn test_generate_while_loading_is_refused() {
        let mut tickets = TicketCounter::default();
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("Travel");
        presenter.set_level(Level::Advanced);
        let job = presenter.begin_generate(tickets.issue()).unwrap();
        assert_eq!(job.topic, "Travel");
        assert_eq!(job.level, Level::Advanced);
        assert!(presenter.is_loading());
        assert!(presenter.begin_generate(tickets.issue()).is_none());
    }

    #[test]
    fn test_success_enters_practice_at_first_card() {
        let presenter = practicing();
        let practice = presenter.practice().unwrap();
        assert_eq!(practice.index(), 0);
        assert_eq!(practice.face(), CardFace::Front);
        assert_eq!(practice.position(), (1, 5));
    }

    #[test]
    fn test_failure_stays_in_setup_with_alert() {
        let mut tickets = TicketCounter::default();
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("Food");
        let ticket = tickets.issue();
        presenter.begin_generate(ticket);
        assert!(presenter.complete_generate(ticket, Err(DomainError::Ai("boom".into()))));
        assert_eq!(presenter.mode(), &FlashcardMode::Setup { generating: None });
        assert_eq!(presenter.take_alert().as_deref(), Some(GENERATION_FAILED_ALERT));
        assert!(presenter.take_alert().is_none());
        assert_eq!(presenter.topic(), "Food");
    }

    #[test]
    fn test_empty_deck_is_a_failure() {
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("Food");
        let ticket = TicketCounter::default().issue();
        presenter.begin_generate(ticket);
        presenter.complete_generate(ticket, Ok(Vec::new()));
        assert!(presenter.practice().is_none());
        assert!(presenter.alert().is_some());
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut presenter = practicing();
        let practice = presenter.practice_mut().unwrap();

        assert!(!practice.previous());
        assert_eq!(practice.index(), 0);

        for _ in 0..10 {
            practice.next();
        }
        assert_eq!(practice.index(), FLASHCARDS_PER_DECK - 1);
        assert!(!practice.next());

        for _ in 0..10 {
            practice.previous();
        }
        assert_eq!(practice.index(), 0);
    }

    #[test]
    fn test_flip_is_independent_of_index_and_reset_on_move() {
        let mut presenter = practicing();
        let practice = presenter.practice_mut().unwrap();

        practice.flip();
        assert_eq!(practice.face(), CardFace::Back);
        assert_eq!(practice.index(), 0);

        // Blocked move keeps the face.
        assert!(!practice.previous());
        assert_eq!(practice.face(), CardFace::Back);

        assert!(practice.next());
        assert_eq!(practice.face(), CardFace::Front);

        practice.flip();
        practice.flip();
        assert_eq!(practice.face(), CardFace::Front);
    }

    #[test]
    fn test_restart_and_back_to_setup() {
        let mut presenter = practicing();
        {
            let practice = presenter.practice_mut().unwrap();
            practice.next();
            practice.next();
            practice.flip();
            practice.restart();
            assert_eq!(practice.index(), 0);
            assert_eq!(practice.face(), CardFace::Front);
        }
        presenter.back_to_setup();
        assert!(presenter.practice().is_none());
        assert!(!presenter.is_loading());
    }

    #[test]
    fn test_stale_completion_ignored() {
        let mut tickets = TicketCounter::default();
        let mut presenter = FlashcardsPresenter::new();
        presenter.set_topic("Food");
        let stale = tickets.issue();
        assert!(!presenter.complete_generate(stale, Ok(cards(5))));
        assert!(presenter.practice().is_none());
    }
}
