// Transient status messages shown after add/edit/delete

use std::fmt;
use std::time::{Duration, Instant};

/// How long a status message stays visible
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Outcome notifications emitted by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Added,
    Edited,
    Deleted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Added => write!(f, "Task added"),
            Status::Edited => write!(f, "Task edited"),
            Status::Deleted => write!(f, "Task deleted"),
        }
    }
}

/// One status slot with a single expiry deadline
///
/// Posting replaces both the message and its deadline, so only the latest
/// message's timer is ever live.
#[derive(Debug, Clone)]
pub struct StatusBanner {
    ttl: Duration,
    current: Option<(Status, Instant)>,
}

impl StatusBanner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    #[cfg(test)]
    fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn post(&mut self, status: Status, now: Instant) {
        self.current = Some((status, now + self.ttl));
    }

    /// The message to display at `now`, if it has not expired
    pub fn current(&self, now: Instant) -> Option<Status> {
        match self.current {
            Some((status, deadline)) if now < deadline => Some(status),
            _ => None,
        }
    }

    #[cfg(test)]
    fn deadline(&self) -> Option<Instant> {
        self.current.map(|(_, deadline)| deadline)
    }
}

impl Default for StatusBanner {
    fn default() -> Self {
        Self::new(STATUS_TTL)
    }
}
