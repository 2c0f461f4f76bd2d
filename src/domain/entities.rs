//! Domain entities. Pure data structures for the tutor.
//!
//! No HTTP/terminal types here: adapters map wire formats into these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cards produced by one flashcard generation.
pub const FLASHCARDS_PER_DECK: usize = 5;

/// Language AI-generated explanations and translations are rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayLanguage {
    #[default]
    English,
    #[serde(rename = "Chinese (Simplified)")]
    ChineseSimplified,
    Malay,
}

impl DisplayLanguage {
    pub const ALL: [DisplayLanguage; 3] = [
        DisplayLanguage::English,
        DisplayLanguage::ChineseSimplified,
        DisplayLanguage::Malay,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            DisplayLanguage::English => "English",
            DisplayLanguage::ChineseSimplified => "Chinese (Simplified)",
            DisplayLanguage::Malay => "Malay",
        }
    }
}

impl fmt::Display for DisplayLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Top-level screens. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Screen {
    #[default]
    Dashboard,
    Flashcards,
    Chat,
    Analyzer,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Dashboard,
        Screen::Flashcards,
        Screen::Chat,
        Screen::Analyzer,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Flashcards => "Flashcards",
            Screen::Chat => "Chat Tutor",
            Screen::Analyzer => "Sentence Analyzer",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Flashcard difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        })
    }
}

/// A single vocabulary card. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    /// The word in kanji, or kana when no kanji form exists.
    pub kanji: String,
    /// Hiragana/katakana reading.
    pub reading: String,
    pub romaji: String,
    pub translation: String,
    pub example_sentence: String,
}

/// One token of an analyzed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisToken {
    pub word: String,
    pub reading: String,
    pub part_of_speech: String,
    pub meaning: String,
}

/// Breakdown of a Japanese sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub original: String,
    pub translation: String,
    pub tokens: Vec<AnalysisToken>,
    pub grammar_notes: String,
}

/// Phrase of the day shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyPhrase {
    pub japanese: String,
    pub reading: String,
    pub translation: String,
    pub context: String,
}

impl DailyPhrase {
    /// Canned phrase used whenever the service cannot produce one.
    pub fn fallback() -> Self {
        Self {
            japanese: "こんにちは".to_string(),
            reading: "Konnichiwa".to_string(),
            translation: "Hello".to_string(),
            context: "Standard greeting.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One entry of the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub text: String,
    /// Unix milliseconds.
    pub timestamp: i64,
}
