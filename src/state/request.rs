//! Generation tickets that let the store ignore superseded responses.

use std::collections::HashMap;

/// A remotely loaded slice of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Markets,
    Watchlist,
    Search,
    Chart,
    Dashboard,
    Wallet,
    Orders,
    OrderDetail,
}

/// Issued when a fetch starts and carried back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub resource: Resource,
    pub generation: u64,
}

/// Per-resource generation counters. Only the latest ticket is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    generations: HashMap<Resource, u64>,
}

impl RequestTracker {
    pub fn issue(&mut self, resource: Resource) -> Ticket {
        let generation = self.generations.entry(resource).or_insert(0);
        *generation += 1;
        Ticket {
            resource,
            generation: *generation,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.generations.get(&ticket.resource) == Some(&ticket.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(Resource::Markets);
        assert!(tracker.is_current(&first));

        let second = tracker.issue(Resource::Markets);
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn test_resources_are_independent() {
        let mut tracker = RequestTracker::default();
        let markets = tracker.issue(Resource::Markets);
        let chart = tracker.issue(Resource::Chart);
        tracker.issue(Resource::Chart);
        assert!(tracker.is_current(&markets));
        assert!(!tracker.is_current(&chart));
    }

    #[test]
    fn test_unissued_ticket_is_stale() {
        let tracker = RequestTracker::default();
        let forged = Ticket {
            resource: Resource::Orders,
            generation: 1,
        };
        assert!(!tracker.is_current(&forged));
    }
}
