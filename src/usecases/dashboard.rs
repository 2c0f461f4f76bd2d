//! Dashboard presenter: phrase of the day plus quick links to the other screens.

use crate::domain::{DailyPhrase, Screen};
use crate::usecases::ticket::Ticket;

/// Screens reachable from the dashboard's quick actions.
pub const QUICK_ACTIONS: [Screen; 3] = [Screen::Flashcards, Screen::Chat, Screen::Analyzer];

#[derive(Debug, Default)]
pub struct DashboardPresenter {
    phrase: Option<DailyPhrase>,
    pending: Option<Ticket>,
}

impl DashboardPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a phrase fetch as outstanding. The previous phrase stays visible until replaced.
    pub fn begin_fetch(&mut self, ticket: Ticket) {
        self.pending = Some(ticket);
    }

    /// Apply a fetched phrase. Returns false if `ticket` is not the outstanding fetch.
    pub fn complete_fetch(&mut self, ticket: Ticket, phrase: DailyPhrase) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.pending = None;
        self.phrase = Some(phrase);
        true
    }

    pub fn phrase(&self) -> Option<&DailyPhrase> {
        self.phrase.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::ticket::TicketCounter;

    #[test]
    fn test_only_latest_fetch_applies() {
        let mut tickets = TicketCounter::default();
        let mut dashboard = DashboardPresenter::new();
        let first = tickets.issue();
        dashboard.begin_fetch(first);
        let second = tickets.issue();
        dashboard.begin_fetch(second);

        assert!(!dashboard.complete_fetch(first, DailyPhrase::fallback()));
        assert!(dashboard.is_loading());
        assert!(dashboard.phrase().is_none());

        assert!(dashboard.complete_fetch(second, DailyPhrase::fallback()));
        assert!(!dashboard.is_loading());
        assert_eq!(dashboard.phrase(), Some(&DailyPhrase::fallback()));
    }
}
