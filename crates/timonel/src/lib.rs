//! Timonel: a deterministic synchronization facade over browser drivers.
//!
//! Timonel (Spanish: "helmsman") gives UI verification scripts a small,
//! stable vocabulary - navigate, locate, interact, wait, assert, capture -
//! instead of raw driver calls. Its value is the synchronization and retry
//! contract: every action resolves its element through one explicit-wait
//! primitive with a fixed per-session timeout, strict operations fail fast on
//! missing preconditions, and tolerant variants degrade element absence into
//! an inspectable miss.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Script                                                      │
//! │    │ open / click / type_text / assert_text / screenshot     │
//! │    ▼                                                         │
//! │  Session ──► Synchronizer (poll until condition or timeout)  │
//! │    │                                                         │
//! │    ▼                                                         │
//! │  WebDriver trait ──► ChromiumDriver (CDP) | MockDriver       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use timonel::{Locator, MockDriver, MockElement, Session, SessionConfig};
//!
//! let driver = MockDriver::new()
//!     .with_element(MockElement::css("#user"))
//!     .with_element(MockElement::css("#flash").with_text("Welcome back"));
//! let mut session = Session::with_config(
//!     driver,
//!     SessionConfig::new().with_wait_timeout(200).with_poll_interval(10),
//! );
//!
//! session.open("https://example.test/login")?;
//! session.type_text(&Locator::css("#user"), "alice")?;
//! let result = session.assert_text(&Locator::css("#flash"), "Welcome")?;
//! assert_eq!(result.status(), "ASSERT_TEXT:#flash:Welcome");
//! session.release();
//! # Ok::<(), timonel::TimonelError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod action;
mod assertion;
mod capture;
mod driver;
mod locator;
mod result;
mod session;
mod wait;

/// Real CDP browser control (requires the `browser` feature and a chromium
/// binary)
#[cfg(feature = "browser")]
pub mod browser;

pub use action::ActionResult;
pub use capture::{CaptureRecord, SCREENSHOT_EXT};
pub use driver::{ElementHandle, MockDriver, MockElement, WebDriver};
pub use locator::{Condition, Locator, Scheme};
pub use result::{TimonelError, TimonelResult};
pub use session::{Session, SessionConfig, DEFAULT_ARTIFACTS_DIR};
pub use wait::{
    poll_until, PollOutcome, Synchronizer, WaitOptions, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_WAIT_TIMEOUT_MS,
};

#[cfg(feature = "browser")]
pub use browser::{BrowserOptions, ChromiumDriver};
