//! Sliding-window message-rate tracking per sender.

use std::collections::{HashMap, VecDeque};

use crate::identity::Identity;

/// Per-identity sliding window of recent message timestamps. In-memory only;
/// abuse detection is best-effort and a restart simply starts fresh.
pub struct RateLimiter {
    window_seconds: u64,
    windows: HashMap<Identity, VecDeque<i64>>,
}

impl RateLimiter {
    pub fn new(window_seconds: u64) -> Self {
        RateLimiter {
            window_seconds,
            windows: HashMap::new(),
        }
    }

    /// Record one message at `now` (unix seconds) and return how many
    /// messages the identity has sent within the window, including this one.
    /// Entries older than `now - window_seconds` are discarded first.
    pub fn record(&mut self, identity: &Identity, now: i64) -> usize {
        let window = self.windows.entry(identity.clone()).or_default();
        let cutoff = now - self.window_seconds as i64;
        while let Some(&oldest) = window.front() {
            if oldest <= cutoff {
                window.pop_front();
            } else {
                break;
            }
        }
        window.push_back(now);
        window.len()
    }

    #[cfg(test)]
    fn window_of(&self, identity: &Identity) -> Option<&VecDeque<i64>> {
        self.windows.get(identity)
    }
}
