//! Request tickets. A presenter remembers the ticket of its outstanding
//! request and ignores any completion carrying a different one.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing tickets.
#[derive(Debug, Default)]
pub struct TicketCounter {
    next: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> Ticket {
        self.next += 1;
        Ticket(self.next)
    }
}
