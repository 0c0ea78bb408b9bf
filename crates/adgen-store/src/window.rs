//! Rate-limit window arithmetic.
//!
//! Shared by the Postgres and in-memory limiters so both grant identically;
//! the backends differ only in how they make the read-modify-write atomic.

use chrono::{DateTime, Utc};

/// One `(api, caller)` counter row.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitWindow {
    /// When the current window began
    pub window_start: DateTime<Utc>,
    /// Slots consumed in the current window
    pub calls_made: i32,
    /// Ceiling per window
    pub max_calls: i32,
    /// Window length in seconds
    pub window_secs: i32,
}

/// Outcome of a grant attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    /// Slots granted, `0 ..= requested`
    pub granted: u32,
    /// Whether the window was reset (expired window rolled over)
    pub reset: bool,
}

impl RateLimitWindow {
    /// Grant up to `requested` slots at time `now`, mutating the window.
    ///
    /// If the window has expired it is restarted at `now` with
    /// `calls_made = min(requested, max_calls)`; otherwise the remainder of
    /// the current window is handed out. `calls_made` never exceeds
    /// `max_calls`.
    pub fn grant(&mut self, requested: u32, now: DateTime<Utc>) -> Grant {
        let max = self.max_calls.max(0) as u32;

        let elapsed = (now - self.window_start).num_seconds();
        if elapsed > self.window_secs as i64 {
            let granted = requested.min(max);
            self.window_start = now;
            self.calls_made = granted as i32;
            return Grant {
                granted,
                reset: true,
            };
        }

        let remaining = max.saturating_sub(self.calls_made.max(0) as u32);
        let granted = requested.min(remaining);
        if granted > 0 {
            self.calls_made += granted as i32;
        }
        Grant {
            granted,
            reset: false,
        }
    }
}
