//! Auto-advance storm detection
//!
//! A track that fails right after starting makes the engine report
//! completion immediately, which auto-advances to the next track, which
//! fails again. The guard counts auto-advances in a sliding window and
//! trips once the budget is exhausted.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window counter of automatic advances
#[derive(Debug, Clone)]
pub struct AutoAdvanceGuard {
    /// Timestamps of recent advances (oldest = front)
    recent: VecDeque<Instant>,

    max_advances: usize,

    window: Duration,
}

impl AutoAdvanceGuard {
    pub fn new(max_advances: usize, window: Duration) -> Self {
        Self {
            recent: VecDeque::with_capacity(max_advances + 1),
            max_advances,
            window,
        }
    }

    /// Record an advance at `now`
    ///
    /// Returns `false` when the advance exceeds the budget and must not run.
    pub fn try_advance(&mut self, now: Instant) -> bool {
        while let Some(&oldest) = self.recent.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.recent.pop_front();
            } else {
                break;
            }
        }

        if self.recent.len() >= self.max_advances {
            return false;
        }

        self.recent.push_back(now);
        true
    }

    /// Forget recorded advances (user took control again)
    pub fn reset(&mut self) {
        self.recent.clear();
    }

    /// Advances currently inside the window
    pub fn recent_count(&self) -> usize {
        self.recent.len()
    }
}
