//! Infrastructure adapters. Implement outbound ports.
//!
//! Gemini, system speech, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod speech;
pub mod ui;
