//! Explicit-wait primitives.
//!
//! [`Synchronizer`] is the single wait mechanism behind every facade action:
//! it polls the driver for a locator/condition pair until the condition holds
//! or the session's fixed timeout elapses. [`poll_until`] is the bounded
//! sleep-and-check loop offered to call sites that need to observe page state
//! (e.g. navigation leaving a known domain) with a hard upper bound on wait
//! time.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::driver::{ElementHandle, WebDriver};
use crate::locator::{Condition, Locator};
use crate::result::{TimonelError, TimonelResult};

/// Default wait timeout applied to every synchronization (15 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (250ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// ============================================================================
// Wait options
// ============================================================================

/// Options for wait operations
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// ============================================================================
// Synchronizer
// ============================================================================

/// Polls the driver for a locator/condition pair up to a fixed timeout.
///
/// The options are fixed at construction; a session builds one synchronizer
/// and applies it uniformly to every operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronizer {
    options: WaitOptions,
}

impl Synchronizer {
    /// Create a synchronizer with the given options
    #[must_use]
    pub const fn new(options: WaitOptions) -> Self {
        Self { options }
    }

    /// Get the wait options
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Resolve `locator` and wait until the element satisfies `condition`.
    ///
    /// The driver is probed at least once even with a zero timeout, so an
    /// already-satisfied condition never fails.
    ///
    /// # Errors
    ///
    /// `Timeout` if the condition never holds within the window; any driver
    /// fault is propagated unchanged.
    pub fn wait_for_element<D: WebDriver>(
        &self,
        driver: &mut D,
        locator: &Locator,
        condition: Condition,
    ) -> TimonelResult<ElementHandle> {
        let start = Instant::now();
        loop {
            if let Some(handle) = driver.probe(locator, condition)? {
                trace!(selector = %locator, %condition, elapsed_ms = start.elapsed().as_millis() as u64, "condition satisfied");
                return Ok(handle);
            }
            if start.elapsed() >= self.options.timeout() {
                debug!(selector = %locator, %condition, timeout_ms = self.options.timeout_ms, "wait timed out");
                return Err(TimonelError::Timeout {
                    ms: self.options.timeout_ms,
                });
            }
            std::thread::sleep(self.options.poll_interval());
        }
    }
}

// ============================================================================
// Bounded polling
// ============================================================================

/// Outcome of a bounded poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The stop predicate held
    Satisfied {
        /// Iterations consumed, including the satisfying one
        iterations: u32,
    },
    /// The iteration budget ran out before the predicate held
    Exhausted {
        /// Iterations consumed (always the full budget)
        iterations: u32,
    },
}

impl PollOutcome {
    /// Whether the predicate held before the budget ran out
    #[must_use]
    pub const fn is_satisfied(&self) -> bool {
        matches!(self, Self::Satisfied { .. })
    }
}

/// Check `predicate` up to `max_iterations` times, sleeping `interval` after
/// each unsatisfied check.
///
/// Always terminates within `max_iterations * interval`, trading a possible
/// false negative for a hard upper bound on wait time.
pub fn poll_until<F>(interval: Duration, max_iterations: u32, mut predicate: F) -> PollOutcome
where
    F: FnMut() -> bool,
{
    for iteration in 1..=max_iterations {
        if predicate() {
            return PollOutcome::Satisfied {
                iterations: iteration,
            };
        }
        std::thread::sleep(interval);
    }
    PollOutcome::Exhausted {
        iterations: max_iterations,
    }
}
