//! Speech adapters. Implement SpeechPort.
//!
//! `SystemSpeech` shells out to the platform TTS command; `SilentSpeech` only logs.

pub mod system;

pub use system::{SilentSpeech, SystemSpeech};
