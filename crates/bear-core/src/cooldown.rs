//! Submission cooldown for the forecast form.
//!
//! A fixed window after each accepted submission during which further
//! submissions are rejected. Rejected attempts do not restart the window,
//! and nothing in flight is cancelled.

use std::time::{Duration, Instant};

use crate::error::InputError;

/// Returned when a submission lands inside the cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownRejected {
    pub remaining: Duration,
}

#[derive(Debug, Clone)]
pub struct SubmitCooldown {
    window: Duration,
    last_accepted: Option<Instant>,
}

impl SubmitCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: None,
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }

    /// True if a submission at `now` would be accepted.
    pub fn can_submit(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// Time left until the next submission is accepted.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_accepted {
            Some(last) => self.window.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Accept a submission at `now`, or reject it without touching the window.
    pub fn try_submit(&mut self, now: Instant) -> Result<(), CooldownRejected> {
        let remaining = self.remaining(now);
        if !remaining.is_zero() {
            return Err(CooldownRejected { remaining });
        }
        self.last_accepted = Some(now);
        Ok(())
    }

    /// Input error for a rejected submission; its user message is the
    /// blocking alert text.
    pub fn rejection(&self, rejected: CooldownRejected) -> InputError {
        InputError::CoolingDown {
            window_secs: self.window.as_secs(),
            remaining_secs: rejected.remaining.as_secs_f64().ceil() as u64,
        }
    }
}
