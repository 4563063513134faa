//! Session lifecycle and navigation.
//!
//! A [`Session`] exclusively owns one driver and one fixed wait policy for
//! its whole lifetime. It is the unit of isolation: concurrent test runs each
//! construct their own session and share nothing. Release is idempotent,
//! best-effort, and also runs on drop, so the driver is shut down on every
//! exit path including panics in the test body.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::driver::{ElementHandle, WebDriver};
use crate::locator::{Condition, Locator};
use crate::result::{TimonelError, TimonelResult};
use crate::wait::{poll_until, PollOutcome, Synchronizer, WaitOptions};
use crate::ActionResult;

/// Default directory screenshots are written under, relative to the working
/// directory
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Configuration fixed at session construction
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wait policy applied uniformly to every synchronization
    pub wait: WaitOptions,
    /// Directory screenshot artifacts are written under
    pub artifacts_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            wait: WaitOptions::default(),
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

impl SessionConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait timeout in milliseconds
    #[must_use]
    pub const fn with_wait_timeout(mut self, timeout_ms: u64) -> Self {
        self.wait.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.wait.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the artifacts directory
    #[must_use]
    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }
}

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Closed,
}

/// Owner of one driver handle and one fixed wait timeout, scoped to one test
/// run.
#[derive(Debug)]
pub struct Session<D: WebDriver> {
    pub(crate) driver: D,
    pub(crate) synchronizer: Synchronizer,
    pub(crate) config: SessionConfig,
    state: SessionState,
}

impl<D: WebDriver> Session<D> {
    /// Create a session with the default configuration (15s wait timeout,
    /// `artifacts/` screenshot directory)
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, SessionConfig::default())
    }

    /// Create a session with an explicit configuration
    #[must_use]
    pub fn with_config(driver: D, config: SessionConfig) -> Self {
        Self {
            driver,
            synchronizer: Synchronizer::new(config.wait),
            config,
            state: SessionState::Open,
        }
    }

    /// Whether the session is still open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub(crate) fn ensure_open(&self) -> TimonelResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(TimonelError::StateError {
                message: "session already released".to_string(),
            })
        }
    }

    /// Resolve a locator through the synchronizer. Every action goes through
    /// here: one resolve-then-wait per call, never a cached handle.
    pub(crate) fn locate(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> TimonelResult<ElementHandle> {
        self.ensure_open()?;
        self.synchronizer
            .wait_for_element(&mut self.driver, locator, condition)
    }

    /// Navigate to an absolute URL or relative path.
    ///
    /// # Errors
    ///
    /// Navigation failures propagate: a broken navigation invalidates the
    /// rest of the script.
    pub fn open(&mut self, url_or_path: &str) -> TimonelResult<ActionResult> {
        self.ensure_open()?;
        self.driver.goto(url_or_path)?;
        info!(target = url_or_path, "opened");
        Ok(ActionResult::success(format!("OPEN:{url_or_path}")))
    }

    /// Instruct the driver to go to a target without resolving any element.
    ///
    /// # Errors
    ///
    /// Failures propagate, matching [`open`](Self::open).
    pub fn navigate(&mut self, path_or_url: &str) -> TimonelResult<ActionResult> {
        self.ensure_open()?;
        self.driver.goto(path_or_url)?;
        Ok(ActionResult::success(format!("NAVIGATE:{path_or_url}")))
    }

    /// Read the current URL defensively: any failure, including use after
    /// release, is returned as a `URL_ERROR:` tagged string rather than
    /// raised. Intended for polling and logging, not as a precondition.
    pub fn current_url(&mut self) -> String {
        if !self.is_open() {
            return "URL_ERROR:session already released".to_string();
        }
        match self.driver.current_url() {
            Ok(url) => url,
            Err(e) => format!("URL_ERROR:{e}"),
        }
    }

    /// Read the page title defensively, mirroring
    /// [`current_url`](Self::current_url).
    pub fn title(&mut self) -> String {
        if !self.is_open() {
            return "TITLE_ERROR:session already released".to_string();
        }
        match self.driver.title() {
            Ok(title) => title,
            Err(e) => format!("TITLE_ERROR:{e}"),
        }
    }

    /// Poll the current URL until it no longer contains `fragment`, sleeping
    /// `interval` between reads, up to `max_iterations` reads.
    ///
    /// Built from [`current_url`](Self::current_url) and [`poll_until`]; it
    /// always terminates within `max_iterations * interval` even if
    /// navigation never completes.
    pub fn wait_until_left(
        &mut self,
        fragment: &str,
        interval: Duration,
        max_iterations: u32,
    ) -> PollOutcome {
        poll_until(interval, max_iterations, || {
            !self.current_url().contains(fragment)
        })
    }

    /// Shut down the driver. Idempotent and best-effort: repeat calls are
    /// no-ops and underlying failures are logged, never raised. The only
    /// operation permitted after the session has been released.
    pub fn release(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.state = SessionState::Closed;
        if let Err(e) = self.driver.quit() {
            warn!(error = %e, "driver quit failed during release");
        }
    }
}

impl<D: WebDriver> Drop for Session<D> {
    fn drop(&mut self) {
        self.release();
    }
}
