//! Screenshot capture and persistence.
//!
//! Capture is diagnostic: nothing here may abort a running script, so every
//! failure path collapses into [`CaptureRecord::Failed`].

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::driver::WebDriver;
use crate::session::Session;

/// File extension appended to screenshot names that lack it
pub const SCREENSHOT_EXT: &str = ".png";

/// Result of a screenshot capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureRecord {
    /// Screenshot written; payload is the absolute target path
    Saved(PathBuf),
    /// Capture or persistence failed; payload describes the failure
    Failed(String),
}

impl CaptureRecord {
    /// The written path, if the capture succeeded
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Saved(path) => Some(path),
            Self::Failed(_) => None,
        }
    }

    /// Whether the capture succeeded
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    /// Descriptive status string, mirroring the action status format
    #[must_use]
    pub fn status(&self) -> String {
        match self {
            Self::Saved(path) => format!("SCREENSHOT:{}", path.display()),
            Self::Failed(message) => format!("SCREENSHOT_ERROR:{message}"),
        }
    }
}

impl std::fmt::Display for CaptureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

/// Append the image extension unless the name already carries it
fn normalize_name(name: &str) -> String {
    if name.ends_with(SCREENSHOT_EXT) {
        name.to_string()
    } else {
        format!("{name}{SCREENSHOT_EXT}")
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

impl<D: WebDriver> Session<D> {
    /// Capture the current page and write it under the session's artifacts
    /// directory as `<name>.png` (extension appended only if absent).
    ///
    /// Deterministic and idempotent: the same name always maps to the same
    /// path, and a repeat call overwrites the previous file. Never raises;
    /// directory, capture, and write failures all come back as
    /// [`CaptureRecord::Failed`].
    pub fn screenshot(&mut self, name: &str) -> CaptureRecord {
        if !self.is_open() {
            return CaptureRecord::Failed("session already released".to_string());
        }
        let target = self.config.artifacts_dir.join(normalize_name(name));
        if let Some(parent) = target.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(error = %e, "could not create artifacts directory");
                return CaptureRecord::Failed(e.to_string());
            }
        }
        let bytes = match self.driver.screenshot_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "driver capture failed");
                return CaptureRecord::Failed(e.to_string());
            }
        };
        if let Err(e) = std::fs::write(&target, bytes) {
            warn!(error = %e, path = %target.display(), "could not write screenshot");
            return CaptureRecord::Failed(e.to_string());
        }
        let absolute = absolutize(&target);
        debug!(path = %absolute.display(), "screenshot written");
        CaptureRecord::Saved(absolute)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::session::{Session, SessionConfig};

    fn session_in(dir: &Path) -> Session<MockDriver> {
        let mut driver = MockDriver::new();
        driver.screenshot_data = vec![0x89, 0x50, 0x4E, 0x47];
        Session::with_config(
            driver,
            SessionConfig::new()
                .with_wait_timeout(50)
                .with_poll_interval(5)
                .with_artifacts_dir(dir),
        )
    }

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_name("shot"), "shot.png");
        assert_eq!(normalize_name("shot.png"), "shot.png");
    }

    #[test]
    fn test_screenshot_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let record = session.screenshot("run1");
        let path = record.path().unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("run1.png"));
        assert_eq!(std::fs::read(path).unwrap(), vec![0x89, 0x50, 0x4E, 0x47]);
        assert!(record.status().starts_with("SCREENSHOT:"));
    }

    #[test]
    fn test_screenshot_idempotent_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        let first = session.screenshot("run1");
        let second = session.screenshot("run1.png");
        assert_eq!(first.path(), second.path());
    }

    #[test]
    fn test_screenshot_absorbs_driver_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.driver.fail_screenshot = true;
        let record = session.screenshot("broken");
        assert!(!record.is_saved());
        assert!(record.status().starts_with("SCREENSHOT_ERROR:"));
    }

    #[test]
    fn test_screenshot_after_release_is_failed_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());
        session.release();
        let record = session.screenshot("late");
        assert!(matches!(record, CaptureRecord::Failed(_)));
    }

    #[test]
    fn test_screenshot_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep/run");
        let mut session = session_in(&nested);
        let record = session.screenshot("shot");
        assert!(record.is_saved());
    }
}
