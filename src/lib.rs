//! sakura-tutor: Terminal Japanese tutor backed by Gemini, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
