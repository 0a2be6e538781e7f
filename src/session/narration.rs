use std::time::{Duration, Instant};

/// Status lines shown while a summary is in flight, with their offsets.
/// Purely cosmetic: they don't track what the agent is actually doing.
pub const STEPS: [(Duration, &str); 3] = [
    (Duration::from_secs(0), "Analyzing selected emails..."),
    (Duration::from_secs(1), "Generating summary..."),
    (Duration::from_secs(2), "Sending to Slack..."),
];

#[derive(Debug, Clone, Copy)]
pub struct Narration {
    started: Instant,
    cancelled: bool,
}

impl Narration {
    pub fn start(now: Instant) -> Self {
        Self {
            started: now,
            cancelled: false,
        }
    }

    /// The latest step whose offset has elapsed at `now`.
    pub fn current(&self, now: Instant) -> Option<&'static str> {
        if self.cancelled {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        STEPS
            .iter()
            .rev()
            .find(|(at, _)| elapsed >= *at)
            .map(|(_, text)| *text)
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
