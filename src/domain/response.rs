//! Structured response validator. Parses the generative service's reply text
//! into domain values, enforcing the declared shape.
//!
//! Single parse attempt per call, no retries. Daily phrases fall back to a
//! canned value; every other shape surfaces a recoverable error.

use crate::domain::{
    AnalysisResult, AnalysisToken, DailyPhrase, DomainError, FLASHCARDS_PER_DECK, Flashcard,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Shown when the tutor's reply comes back empty.
pub const EMPTY_CHAT_REPLY: &str = "Sumimasen, I didn't catch that.";

/// Strip markdown fences or surrounding prose from a JSON reply.
///
/// Models sometimes wrap JSON in code blocks even when asked for JSON only.
pub fn sanitize_json(raw_text: &str) -> String {
    let trimmed = raw_text.trim();

    if trimmed.starts_with("```") {
        let without_prefix = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
            .unwrap_or(trimmed);

        if let Some(end_idx) = without_prefix.rfind("```") {
            return without_prefix[..end_idx].trim().to_string();
        }
        return without_prefix.trim().to_string();
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

fn parse_json<T: DeserializeOwned>(raw_text: &str) -> Result<T, DomainError> {
    let clean = sanitize_json(raw_text);
    serde_json::from_str(&clean).map_err(|e| {
        warn!(error = %e, json = %clean.chars().take(200).collect::<String>(), "JSON parse failed");
        DomainError::InvalidResponse(e.to_string())
    })
}

fn require(value: Option<String>, field: &str) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::InvalidResponse(format!(
            "missing required field `{}`",
            field
        ))),
    }
}

#[derive(Deserialize)]
struct WireDeck {
    cards: Option<Vec<WireCard>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCard {
    kanji: Option<String>,
    reading: Option<String>,
    romaji: Option<String>,
    translation: Option<String>,
    example_sentence: Option<String>,
}

/// Parse a flashcard-set reply. Surplus cards are dropped; a short deck is an error.
///
/// `id_seed` makes the generated card ids unique per generation (unix millis).
pub fn parse_flashcards(raw_text: &str, id_seed: i64) -> Result<Vec<Flashcard>, DomainError> {
    let deck: WireDeck = parse_json(raw_text)?;
    let cards = deck
        .cards
        .ok_or_else(|| DomainError::InvalidResponse("missing required field `cards`".into()))?;

    if cards.len() < FLASHCARDS_PER_DECK {
        return Err(DomainError::InvalidResponse(format!(
            "expected {} cards, got {}",
            FLASHCARDS_PER_DECK,
            cards.len()
        )));
    }
    if cards.len() > FLASHCARDS_PER_DECK {
        debug!(
            got = cards.len(),
            "truncating surplus flashcards to {}", FLASHCARDS_PER_DECK
        );
    }

    cards
        .into_iter()
        .take(FLASHCARDS_PER_DECK)
        .enumerate()
        .map(|(index, card)| {
            Ok(Flashcard {
                id: format!("card-{}-{}", id_seed, index),
                kanji: require(card.kanji, "kanji")?,
                reading: require(card.reading, "reading")?,
                romaji: require(card.romaji, "romaji")?,
                translation: require(card.translation, "translation")?,
                example_sentence: require(card.example_sentence, "exampleSentence")?,
            })
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAnalysis {
    original: Option<String>,
    translation: Option<String>,
    tokens: Option<Vec<WireToken>>,
    grammar_notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireToken {
    word: Option<String>,
    reading: Option<String>,
    part_of_speech: Option<String>,
    meaning: Option<String>,
}

/// Parse a sentence-analysis reply. `submitted` fills in a missing `original`.
pub fn parse_analysis(raw_text: &str, submitted: &str) -> Result<AnalysisResult, DomainError> {
    let wire: WireAnalysis = parse_json(raw_text)?;
    let translation = require(wire.translation, "translation")?;

    let tokens = wire
        .tokens
        .unwrap_or_default()
        .into_iter()
        .map(|t| {
            Ok(AnalysisToken {
                word: require(t.word, "tokens[].word")?,
                reading: t.reading.unwrap_or_default(),
                part_of_speech: t.part_of_speech.unwrap_or_default(),
                meaning: t.meaning.unwrap_or_default(),
            })
        })
        .collect::<Result<Vec<_>, DomainError>>()?;
    if tokens.is_empty() {
        return Err(DomainError::InvalidResponse("no tokens in analysis".into()));
    }

    let original = wire
        .original
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| submitted.trim().to_string());

    Ok(AnalysisResult {
        original,
        translation,
        tokens,
        grammar_notes: wire.grammar_notes.unwrap_or_default(),
    })
}

#[derive(Deserialize)]
struct WirePhrase {
    japanese: Option<String>,
    reading: Option<String>,
    translation: Option<String>,
    context: Option<String>,
}

fn try_parse_daily_phrase(raw_text: &str) -> Result<DailyPhrase, DomainError> {
    let wire: WirePhrase = parse_json(raw_text)?;
    Ok(DailyPhrase {
        japanese: require(wire.japanese, "japanese")?,
        reading: require(wire.reading, "reading")?,
        translation: require(wire.translation, "translation")?,
        context: require(wire.context, "context")?,
    })
}

/// Parse a daily-phrase reply. Never fails: anything malformed yields the canned phrase.
pub fn parse_daily_phrase(raw_text: &str) -> DailyPhrase {
    try_parse_daily_phrase(raw_text).unwrap_or_else(|e| {
        warn!(error = %e, "daily phrase reply unusable, using fallback");
        DailyPhrase::fallback()
    })
}

/// Normalize a free-text chat reply.
pub fn parse_chat_reply(raw_text: &str) -> String {
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        EMPTY_CHAT_REPLY.to_string()
    } else {
        trimmed.to_string()
    }
}
