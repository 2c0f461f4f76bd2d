//! Analyzer presenter: one input, one result slot, one error banner.

use crate::domain::{AnalysisResult, DomainError};
use crate::usecases::ticket::Ticket;
use tracing::{debug, warn};

pub const ANALYSIS_FAILED_BANNER: &str = "Could not analyze the sentence. Please try again.";

#[derive(Debug, Default)]
pub struct AnalyzerPresenter {
    input: String,
    result: Option<AnalysisResult>,
    error: Option<String>,
    pending: Option<Ticket>,
}

impl AnalyzerPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start an analysis of `input`. Blank input or an outstanding request
    /// leaves every field untouched and returns None.
    pub fn submit(&mut self, input: &str, ticket: Ticket) -> Option<String> {
        if input.trim().is_empty() || self.pending.is_some() {
            return None;
        }
        self.input = input.to_string();
        self.result = None;
        self.error = None;
        self.pending = Some(ticket);
        Some(self.input.clone())
    }

    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, DomainError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            debug!(%ticket, "ignoring stale analysis");
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(e) => {
                warn!(error = %e, "sentence analysis failed");
                self.error = Some(ANALYSIS_FAILED_BANNER.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AnalysisToken;
    use crate::usecases::ticket::TicketCounter;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            original: "私は学生です".into(),
            translation: "I am a student.".into(),
            tokens: vec![AnalysisToken {
                word: "学生".into(),
                reading: "がくせい".into(),
                part_of_speech: "Noun".into(),
                meaning: "student".into(),
            }],
            grammar_notes: String::new(),
        }
    }

    #[test]
    fn test_whitespace_input_changes_nothing() {
        let mut tickets = TicketCounter::default();
        let mut analyzer = AnalyzerPresenter::new();
        let ticket = tickets.issue();
        analyzer.submit("私は学生です", ticket).unwrap();
        analyzer.complete(ticket, Ok(sample()));

        assert!(analyzer.submit(" \t\n ", tickets.issue()).is_none());
        assert_eq!(analyzer.result(), Some(&sample()));
        assert_eq!(analyzer.input(), "私は学生です");
        assert!(!analyzer.is_loading());
    }

    #[test]
    fn test_submit_clears_previous_result_and_error() {
        let mut tickets = TicketCounter::default();
        let mut analyzer = AnalyzerPresenter::new();
        let first = tickets.issue();
        analyzer.submit("一", first);
        analyzer.complete(first, Err(DomainError::Ai("down".into())));
        assert_eq!(analyzer.error(), Some(ANALYSIS_FAILED_BANNER));
        assert_eq!(analyzer.input(), "一");

        let second = tickets.issue();
        analyzer.submit("二", second);
        assert!(analyzer.error().is_none());
        assert!(analyzer.result().is_none());
        assert!(analyzer.is_loading());

        analyzer.complete(second, Ok(sample()));
        assert!(analyzer.result().is_some());
        assert!(analyzer.error().is_none());
    }

    #[test]
    fn test_resubmit_while_loading_refused() {
        let mut tickets = TicketCounter::default();
        let mut analyzer = AnalyzerPresenter::new();
        let first = tickets.issue();
        analyzer.submit("一", first);
        assert!(analyzer.submit("二", tickets.issue()).is_none());
        assert_eq!(analyzer.input(), "一");
        assert!(!analyzer.complete(tickets.issue(), Ok(sample())));
        assert!(analyzer.complete(first, Ok(sample())));
    }
}
