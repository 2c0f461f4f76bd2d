//! Request builder. Turns a user intent into a prompt plus the declared
//! structured-output contract the generative service must honor.
//!
//! Pure: nothing here performs I/O.

use crate::domain::{DisplayLanguage, DomainError, Level};
use serde_json::{Value, json};

/// What the learner asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    DailyPhrase,
    FlashcardSet,
    SentenceAnalysis,
}

/// Shape the reply text must parse into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    FlashcardSet,
    SentenceAnalysis,
    DailyPhrase,
}

impl ResponseShape {
    /// Gemini `responseSchema` for this shape.
    pub fn schema(self) -> Value {
        match self {
            ResponseShape::FlashcardSet => json!({
                "type": "OBJECT",
                "properties": {
                    "cards": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "kanji": { "type": "STRING", "description": "The word in Kanji (or Hiragana if no Kanji exists)" },
                                "reading": { "type": "STRING", "description": "The reading in Hiragana/Katakana" },
                                "romaji": { "type": "STRING", "description": "The romanized reading" },
                                "translation": { "type": "STRING", "description": "Meaning in the target language" },
                                "exampleSentence": { "type": "STRING", "description": "A short example sentence in Japanese" }
                            },
                            "required": self.required_fields()
                        }
                    }
                },
                "required": ["cards"]
            }),
            ResponseShape::SentenceAnalysis => json!({
                "type": "OBJECT",
                "properties": {
                    "original": { "type": "STRING" },
                    "translation": { "type": "STRING", "description": "Translation of the full sentence in the target language" },
                    "tokens": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "word": { "type": "STRING" },
                                "reading": { "type": "STRING" },
                                "partOfSpeech": { "type": "STRING" },
                                "meaning": { "type": "STRING", "description": "Meaning of the word in the target language" }
                            },
                            "required": ["word"]
                        }
                    },
                    "grammarNotes": { "type": "STRING", "description": "Brief explanation of key grammar points used, explained in the target language." }
                },
                "required": self.required_fields()
            }),
            ResponseShape::DailyPhrase => json!({
                "type": "OBJECT",
                "properties": {
                    "japanese": { "type": "STRING" },
                    "reading": { "type": "STRING" },
                    "translation": { "type": "STRING", "description": "Translation in the target language" },
                    "context": { "type": "STRING", "description": "Cultural context or usage note, explained in the target language" }
                },
                "required": self.required_fields()
            }),
        }
    }

    /// Fields the validator insists on (per card for flashcard sets).
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            ResponseShape::FlashcardSet => {
                &["kanji", "reading", "romaji", "translation", "exampleSentence"]
            }
            ResponseShape::SentenceAnalysis => &["translation", "tokens"],
            ResponseShape::DailyPhrase => &["japanese", "reading", "translation", "context"],
        }
    }
}

/// One-shot structured generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub intent: Intent,
    pub language: DisplayLanguage,
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub shape: ResponseShape,
}

/// Parameters for opening a stateful chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSessionRequest {
    pub language: DisplayLanguage,
    pub system_instruction: String,
}

/// A single learner turn appended to a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub language: DisplayLanguage,
    pub text: String,
}

/// Builds requests for each intent.
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn daily_phrase(language: DisplayLanguage) -> GenerationRequest {
        GenerationRequest {
            intent: Intent::DailyPhrase,
            language,
            prompt: format!(
                "Give me a useful Japanese phrase for daily life, different from yesterday. \
                 Include cultural context. Translate everything to {}.",
                language
            ),
            system_instruction: None,
            shape: ResponseShape::DailyPhrase,
        }
    }

    pub fn flashcard_set(
        topic: &str,
        level: Level,
        language: DisplayLanguage,
    ) -> Result<GenerationRequest, DomainError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DomainError::EmptyInput("flashcard topic"));
        }
        Ok(GenerationRequest {
            intent: Intent::FlashcardSet,
            language,
            prompt: format!(
                "Generate 5 Japanese vocabulary flashcards for the topic: \"{}\".\n\
                 The difficulty level is {}.\n\
                 Translate meanings and explanations into {}.\n\
                 Ensure the examples are simple and relevant.",
                topic, level, language
            ),
            system_instruction: Some(format!(
                "You are an expert Japanese language teacher. Provide translations in {}.",
                language
            )),
            shape: ResponseShape::FlashcardSet,
        })
    }

    pub fn sentence_analysis(
        sentence: &str,
        language: DisplayLanguage,
    ) -> Result<GenerationRequest, DomainError> {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            return Err(DomainError::EmptyInput("sentence"));
        }
        Ok(GenerationRequest {
            intent: Intent::SentenceAnalysis,
            language,
            prompt: format!(
                "Analyze this Japanese sentence: \"{}\".\n\
                 Break it down into tokens, translate it to {}, and explain the grammar in {}.",
                sentence, language, language
            ),
            system_instruction: Some(format!(
                "You are a Japanese linguistics expert. Provide clear, beginner-friendly explanations in {}.",
                language
            )),
            shape: ResponseShape::SentenceAnalysis,
        })
    }

    pub fn chat_session(language: DisplayLanguage) -> ChatSessionRequest {
        ChatSessionRequest {
            language,
            system_instruction: format!(
                "You are 'Sakura-sensei', a friendly, encouraging, and polite Japanese tutor. \
                 You speak in a mix of simple Japanese and {lang} to help the user learn. \
                 Correct their mistakes gently. If they ask to practice a specific scenario, \
                 roleplay it with them. Explanations should be in {lang}.",
                lang = language
            ),
        }
    }

    pub fn chat_turn(text: &str, language: DisplayLanguage) -> Result<ChatTurn, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::EmptyInput("chat message"));
        }
        Ok(ChatTurn {
            language,
            text: text.to_string(),
        })
    }
}
