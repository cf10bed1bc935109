use std::time::Duration;

use tokio::time::Instant;

/// Per-worker wall-clock cutoff.
///
/// Armed once at worker start and only ever observed afterwards; the
/// transition to expired is one-way. The same instant bounds every blocking
/// socket operation (via `tokio::time::timeout_at`), so an in-flight
/// connect/write/read is cut off at the moment the loop would stop anyway.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn arm(duration: Duration) -> Self {
        Self {
            at: Instant::now() + duration,
        }
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }

    pub fn instant(&self) -> Instant {
        self.at
    }
}
