//! Abstract browser-driver boundary.
//!
//! [`WebDriver`] is the single capability the facade consumes: navigate,
//! locate, act on a resolved element, capture, quit. Implementations can be
//! swapped without touching the synchronization or action layers.
//!
//! Two implementations ship with the crate:
//!
//! - `ChromiumDriver` (feature `browser`) - real CDP control, see
//!   [`crate::browser`]
//! - [`MockDriver`] - deterministic in-memory double for exercising the
//!   facade's retry and timeout logic without a live browser

use serde::{Deserialize, Serialize};

use crate::locator::{Condition, Locator, Scheme};
use crate::result::{TimonelError, TimonelResult};

/// Opaque handle to an element resolved by a single lookup.
///
/// Valid only for the action call that resolved it; actions never reuse a
/// handle across lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-scoped identifier for the resolved element
    pub id: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Capability trait over a browser-automation driver.
///
/// All calls are blocking; the facade applies its own wait policy on top of
/// [`probe`](Self::probe), so implementations should answer probes with the
/// current state of the page rather than waiting themselves.
pub trait WebDriver: Send {
    /// Navigate to an absolute URL or relative path
    fn goto(&mut self, url: &str) -> TimonelResult<()>;

    /// Read the current URL
    fn current_url(&mut self) -> TimonelResult<String>;

    /// Read the current page title
    fn title(&mut self) -> TimonelResult<String>;

    /// Look up the element addressed by `locator` and report it only if it
    /// currently satisfies `condition`. `Ok(None)` means "not there yet" and
    /// is retried by the synchronizer; `Err` means the driver itself failed.
    fn probe(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> TimonelResult<Option<ElementHandle>>;

    /// Click a resolved element
    fn click(&mut self, element: &ElementHandle) -> TimonelResult<()>;

    /// Clear the current content of a resolved input element
    fn clear(&mut self, element: &ElementHandle) -> TimonelResult<()>;

    /// Send text to a resolved element
    fn send_text(&mut self, element: &ElementHandle, text: &str) -> TimonelResult<()>;

    /// Send a literal Enter keypress to a resolved element
    fn press_enter(&mut self, element: &ElementHandle) -> TimonelResult<()>;

    /// Read the rendered text of a resolved element
    fn read_text(&mut self, element: &ElementHandle) -> TimonelResult<String>;

    /// Choose the option with the given value on a resolved select element
    fn select_value(&mut self, element: &ElementHandle, value: &str) -> TimonelResult<()>;

    /// Capture the current page as raw PNG bytes
    fn screenshot_bytes(&mut self) -> TimonelResult<Vec<u8>>;

    /// Shut down the driver. Called at most once by the facade.
    fn quit(&mut self) -> TimonelResult<()>;
}

// ============================================================================
// Mock driver
// ============================================================================

/// A scripted element served by [`MockDriver`]
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Addressing scheme the element answers to
    pub scheme: Scheme,
    /// Selector the element answers to
    pub selector: String,
    /// Whether the element is rendered
    pub visible: bool,
    /// Whether the element accepts clicks
    pub clickable: bool,
    /// Rendered text content
    pub text: String,
    /// Current input value (mutated by clear/send_text/select)
    pub value: String,
    /// Number of probes to ignore before the element materializes
    pub appears_after_probes: u32,
    probes_seen: u32,
}

impl MockElement {
    /// Create a visible, clickable element answering to a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Scheme::Css, selector)
    }

    /// Create a visible, clickable element answering to an XPath expression
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self::new(Scheme::XPath, selector)
    }

    fn new(scheme: Scheme, selector: impl Into<String>) -> Self {
        Self {
            scheme,
            selector: selector.into(),
            visible: true,
            clickable: true,
            text: String::new(),
            value: String::new(),
            appears_after_probes: 0,
            probes_seen: 0,
        }
    }

    /// Set visibility
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set clickability
    #[must_use]
    pub const fn with_clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Set rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Make the element invisible to the first `probes` lookups, so tests can
    /// exercise the retry loop
    #[must_use]
    pub const fn appears_after(mut self, probes: u32) -> Self {
        self.appears_after_probes = probes;
        self
    }

    fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::Visible => self.visible,
            Condition::Clickable => self.visible && self.clickable,
        }
    }
}

/// Deterministic in-memory driver for unit-testing the facade.
///
/// Elements are scripted up front; probes, actions, and lifecycle calls are
/// recorded in a call history for verification.
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Page title
    pub title: String,
    /// Scripted elements
    elements: Vec<MockElement>,
    /// Successive URLs returned by consecutive `current_url` calls; the last
    /// entry repeats once the sequence is exhausted
    url_sequence: Vec<String>,
    url_cursor: usize,
    /// Screenshot bytes to serve
    pub screenshot_data: Vec<u8>,
    /// Inject a failure into `screenshot_bytes`
    pub fail_screenshot: bool,
    /// Inject a failure into `current_url` / `title`
    pub fail_reads: bool,
    /// Inject a failure into `goto`
    pub fail_navigation: bool,
    /// Inject a failure into `quit`
    pub fail_quit: bool,
    /// Number of times `quit` was invoked
    pub quit_calls: u32,
    /// Call history for verification
    pub call_history: Vec<String>,
}

impl MockDriver {
    /// Create a new mock driver with no scripted elements
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an element
    pub fn add_element(&mut self, element: MockElement) {
        self.elements.push(element);
    }

    /// Script an element, builder style
    #[must_use]
    pub fn with_element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Serve these URLs from consecutive `current_url` calls
    pub fn set_url_sequence(&mut self, urls: Vec<String>) {
        self.url_sequence = urls;
        self.url_cursor = 0;
    }

    /// Get the recorded call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check whether a call with this prefix was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(prefix))
    }

    /// Inspect the current input value of a scripted element
    #[must_use]
    pub fn value_of(&self, selector: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.selector == selector)
            .map(|e| e.value.as_str())
    }

    fn element_mut(&mut self, handle: &ElementHandle) -> TimonelResult<&mut MockElement> {
        self.elements
            .iter_mut()
            .find(|e| e.selector == handle.id)
            .ok_or_else(|| TimonelError::DriverError {
                message: format!("stale element handle: {}", handle.id),
            })
    }
}

impl WebDriver for MockDriver {
    fn goto(&mut self, url: &str) -> TimonelResult<()> {
        self.call_history.push(format!("goto:{url}"));
        if self.fail_navigation {
            return Err(TimonelError::NavigationError {
                url: url.to_string(),
                message: "mock navigation failure".to_string(),
            });
        }
        self.current_url = url.to_string();
        Ok(())
    }

    fn current_url(&mut self) -> TimonelResult<String> {
        self.call_history.push("current_url".to_string());
        if self.fail_reads {
            return Err(TimonelError::DriverError {
                message: "mock read failure".to_string(),
            });
        }
        if !self.url_sequence.is_empty() {
            let url = self.url_sequence[self.url_cursor].clone();
            if self.url_cursor + 1 < self.url_sequence.len() {
                self.url_cursor += 1;
            }
            return Ok(url);
        }
        Ok(self.current_url.clone())
    }

    fn title(&mut self) -> TimonelResult<String> {
        self.call_history.push("title".to_string());
        if self.fail_reads {
            return Err(TimonelError::DriverError {
                message: "mock read failure".to_string(),
            });
        }
        Ok(self.title.clone())
    }

    fn probe(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> TimonelResult<Option<ElementHandle>> {
        self.call_history
            .push(format!("probe:{}:{condition}", locator.selector()));
        let found = self
            .elements
            .iter_mut()
            .find(|e| e.scheme == locator.scheme() && e.selector == locator.selector());
        let Some(element) = found else {
            return Ok(None);
        };
        element.probes_seen += 1;
        if element.probes_seen <= element.appears_after_probes {
            return Ok(None);
        }
        if element.satisfies(condition) {
            Ok(Some(ElementHandle::new(element.selector.clone())))
        } else {
            Ok(None)
        }
    }

    fn click(&mut self, element: &ElementHandle) -> TimonelResult<()> {
        self.call_history.push(format!("click:{}", element.id));
        self.element_mut(element)?;
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> TimonelResult<()> {
        self.call_history.push(format!("clear:{}", element.id));
        self.element_mut(element)?.value.clear();
        Ok(())
    }

    fn send_text(&mut self, element: &ElementHandle, text: &str) -> TimonelResult<()> {
        self.call_history
            .push(format!("send_text:{}:{text}", element.id));
        self.element_mut(element)?.value.push_str(text);
        Ok(())
    }

    fn press_enter(&mut self, element: &ElementHandle) -> TimonelResult<()> {
        self.call_history.push(format!("press_enter:{}", element.id));
        self.element_mut(element)?;
        Ok(())
    }

    fn read_text(&mut self, element: &ElementHandle) -> TimonelResult<String> {
        self.call_history.push(format!("read_text:{}", element.id));
        Ok(self.element_mut(element)?.text.clone())
    }

    fn select_value(&mut self, element: &ElementHandle, value: &str) -> TimonelResult<()> {
        self.call_history
            .push(format!("select:{}:{value}", element.id));
        let target = self.element_mut(element)?;
        target.value = value.to_string();
        Ok(())
    }

    fn screenshot_bytes(&mut self) -> TimonelResult<Vec<u8>> {
        self.call_history.push("screenshot".to_string());
        if self.fail_screenshot {
            return Err(TimonelError::DriverError {
                message: "mock capture failure".to_string(),
            });
        }
        Ok(self.screenshot_data.clone())
    }

    fn quit(&mut self) -> TimonelResult<()> {
        self.call_history.push("quit".to_string());
        self.quit_calls += 1;
        if self.fail_quit {
            return Err(TimonelError::DriverError {
                message: "mock quit failure".to_string(),
            });
        }
        Ok(())
    }
}
