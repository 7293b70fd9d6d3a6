//! Consecutive-failure circuit breaker for pipeline runs.

/// Observable breaker state after each recorded completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Healthy,
    /// Between 1 and `threshold - 1` consecutive failures.
    Degrading { consecutive_failures: u32 },
    /// Terminal for the run.
    Tripped,
}

/// Counts consecutive item failures in completion order.
///
/// Any success while degrading resets the count. Reaching `threshold`
/// consecutive failures trips the breaker; once tripped it stays tripped and
/// further completions are ignored.
#[derive(Debug, Clone)]
pub struct FailureBreaker {
    threshold: u32,
    consecutive_failures: u32,
    tripped: bool,
}

impl FailureBreaker {
    /// Creates a breaker. A `threshold` of 0 is treated as 1.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_failures: 0,
            tripped: false,
        }
    }

    /// Records one completed item and returns the resulting state.
    pub fn record(&mut self, succeeded: bool) -> BreakerState {
        if self.tripped {
            return BreakerState::Tripped;
        }

        if succeeded {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures += 1;
            if self.consecutive_failures >= self.threshold {
                self.tripped = true;
            }
        }

        self.state()
    }

    #[must_use]
    pub fn state(&self) -> BreakerState {
        if self.tripped {
            BreakerState::Tripped
        } else if self.consecutive_failures == 0 {
            BreakerState::Healthy
        } else {
            BreakerState::Degrading {
                consecutive_failures: self.consecutive_failures,
            }
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}
