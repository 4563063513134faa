//! Interaction operations and their uniform status results.
//!
//! Every operation resolves its locator through the synchronizer, performs
//! exactly one action against the freshly resolved element, and returns a
//! status string of the form `<VERB>:<target>[:<extra>]`. Strict operations
//! propagate failure; tolerant ones convert element absence into a
//! [`ActionResult::Miss`] so scripts can keep going past optional elements.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::driver::WebDriver;
use crate::locator::{Condition, Locator, Scheme};
use crate::result::TimonelResult;
use crate::session::Session;

/// Tagged outcome of a facade operation.
///
/// Call sites pattern-match on the variant instead of inspecting the status
/// string; the string exists for logs and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionResult {
    /// The operation ran; payload is the `<VERB>:<target>[:<extra>]` status
    Success(String),
    /// A tolerant operation absorbed an absent element; payload is exactly
    /// `<VERB>:<target>:MISS`
    Miss(String),
}

impl ActionResult {
    /// Create a success result
    #[must_use]
    pub fn success(status: impl Into<String>) -> Self {
        Self::Success(status.into())
    }

    /// Create a miss result
    #[must_use]
    pub fn miss(status: impl Into<String>) -> Self {
        Self::Miss(status.into())
    }

    /// The descriptive status string, for either variant
    #[must_use]
    pub fn status(&self) -> &str {
        match self {
            Self::Success(s) | Self::Miss(s) => s,
        }
    }

    /// Whether this is a tolerant miss
    #[must_use]
    pub const fn is_miss(&self) -> bool {
        matches!(self, Self::Miss(_))
    }
}

impl std::fmt::Display for ActionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status())
    }
}

const fn click_verb(scheme: Scheme) -> &'static str {
    match scheme {
        Scheme::Css => "CLICK",
        Scheme::XPath => "CLICK_XPATH",
    }
}

const fn try_click_verb(scheme: Scheme) -> &'static str {
    match scheme {
        Scheme::Css => "TRY_CLICK",
        Scheme::XPath => "TRY_CLICK_XPATH",
    }
}

const fn wait_visible_verb(scheme: Scheme) -> &'static str {
    match scheme {
        Scheme::Css => "WAIT_VISIBLE",
        Scheme::XPath => "WAIT_VISIBLE_XPATH",
    }
}

impl<D: WebDriver> Session<D> {
    /// Wait until the element is clickable, then click it.
    ///
    /// # Errors
    ///
    /// `Timeout` if nothing satisfies the condition within the session wait
    /// window; a missing required element means the script's precondition is
    /// broken, so the failure is fatal.
    pub fn click(&mut self, locator: &Locator) -> TimonelResult<ActionResult> {
        let handle = self.locate(locator, Condition::Clickable)?;
        self.driver.click(&handle)?;
        debug!(selector = %locator, "clicked");
        Ok(ActionResult::success(format!(
            "{}:{locator}",
            click_verb(locator.scheme())
        )))
    }

    /// Tolerant click: element absence becomes a miss instead of an error.
    ///
    /// Only the absence class (timeout waiting for the element) is absorbed;
    /// driver faults and use-after-release still propagate, so genuine
    /// defects are not masked.
    ///
    /// # Errors
    ///
    /// Anything other than element absence.
    pub fn try_click(&mut self, locator: &Locator) -> TimonelResult<ActionResult> {
        match self.click(locator) {
            Ok(result) => Ok(result),
            Err(e) if e.is_absence() => {
                warn!(selector = %locator, "optional element not clickable, recording miss");
                Ok(ActionResult::miss(format!(
                    "{}:{locator}:MISS",
                    try_click_verb(locator.scheme())
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Tolerant click addressed by path expression.
    ///
    /// # Errors
    ///
    /// Anything other than element absence, as in [`try_click`](Self::try_click).
    pub fn try_click_by_path(&mut self, selector: &str) -> TimonelResult<ActionResult> {
        self.try_click(&Locator::xpath(selector))
    }

    /// Wait until the element is visible, clear its content, then input
    /// `text`.
    ///
    /// # Errors
    ///
    /// `Timeout` on element absence; driver faults propagate.
    pub fn type_text(&mut self, locator: &Locator, text: &str) -> TimonelResult<ActionResult> {
        let handle = self.locate(locator, Condition::Visible)?;
        self.driver.clear(&handle)?;
        self.driver.send_text(&handle, text)?;
        debug!(selector = %locator, "typed");
        Ok(ActionResult::success(format!("TYPE:{locator}:{text}")))
    }

    /// Wait until the element is visible, then send Enter without clearing.
    ///
    /// # Errors
    ///
    /// `Timeout` on element absence; driver faults propagate.
    pub fn press_enter(&mut self, locator: &Locator) -> TimonelResult<ActionResult> {
        let handle = self.locate(locator, Condition::Visible)?;
        self.driver.press_enter(&handle)?;
        Ok(ActionResult::success(format!("ENTER:{locator}")))
    }

    /// Wait until the element is visible, then choose the option with the
    /// given value.
    ///
    /// # Errors
    ///
    /// `Timeout` on element absence; driver faults propagate.
    pub fn select(&mut self, locator: &Locator, value: &str) -> TimonelResult<ActionResult> {
        let handle = self.locate(locator, Condition::Visible)?;
        self.driver.select_value(&handle, value)?;
        Ok(ActionResult::success(format!("SELECT:{locator}:{value}")))
    }

    /// Wait until the element is visible and return; no further action.
    ///
    /// # Errors
    ///
    /// `Timeout` on element absence.
    pub fn wait_for_visible(&mut self, locator: &Locator) -> TimonelResult<ActionResult> {
        self.locate(locator, Condition::Visible)?;
        Ok(ActionResult::success(format!(
            "{}:{locator}",
            wait_visible_verb(locator.scheme())
        )))
    }

    /// [`wait_for_visible`](Self::wait_for_visible) addressed by path
    /// expression.
    ///
    /// # Errors
    ///
    /// `Timeout` on element absence.
    pub fn wait_for_visible_by_path(&mut self, selector: &str) -> TimonelResult<ActionResult> {
        self.wait_for_visible(&Locator::xpath(selector))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::result::TimonelError;
    use crate::session::SessionConfig;

    fn session_with(driver: MockDriver) -> Session<MockDriver> {
        Session::with_config(
            driver,
            SessionConfig::new().with_wait_timeout(50).with_poll_interval(5),
        )
    }

    mod action_result_tests {
        use super::*;

        #[test]
        fn test_success_status() {
            let result = ActionResult::success("CLICK:#go");
            assert_eq!(result.status(), "CLICK:#go");
            assert!(!result.is_miss());
        }

        #[test]
        fn test_miss_status() {
            let result = ActionResult::miss("TRY_CLICK:#go:MISS");
            assert_eq!(result.status(), "TRY_CLICK:#go:MISS");
            assert!(result.is_miss());
        }

        #[test]
        fn test_display_is_status() {
            assert_eq!(ActionResult::success("ENTER:#q").to_string(), "ENTER:#q");
        }
    }

    mod strict_action_tests {
        use super::*;

        #[test]
        fn test_click_status() {
            let driver =
                MockDriver::new().with_element(MockElement::css("button[type='submit']"));
            let mut session = session_with(driver);
            let result = session.click(&Locator::css("button[type='submit']")).unwrap();
            assert_eq!(result.status(), "CLICK:button[type='submit']");
        }

        #[test]
        fn test_click_xpath_status() {
            let driver = MockDriver::new().with_element(MockElement::xpath("//a[@id='go']"));
            let mut session = session_with(driver);
            let result = session.click(&Locator::xpath("//a[@id='go']")).unwrap();
            assert_eq!(result.status(), "CLICK_XPATH://a[@id='go']");
        }

        #[test]
        fn test_click_times_out_without_partial_action() {
            let driver =
                MockDriver::new().with_element(MockElement::css("#disabled-btn").with_clickable(false));
            let mut session = session_with(driver);
            let result = session.click(&Locator::css("#disabled-btn"));
            assert!(matches!(result, Err(TimonelError::Timeout { .. })));
            assert!(!session.driver.was_called("click:"));
        }

        #[test]
        fn test_type_clears_before_input() {
            let driver =
                MockDriver::new().with_element(MockElement::css("#user"));
            let mut session = session_with(driver);
            let result = session.type_text(&Locator::css("#user"), "alice").unwrap();
            assert_eq!(result.status(), "TYPE:#user:alice");
            let history = session.driver.history();
            let clear_at = history.iter().position(|c| c == "clear:#user").unwrap();
            let send_at = history
                .iter()
                .position(|c| c == "send_text:#user:alice")
                .unwrap();
            assert!(clear_at < send_at);
        }

        #[test]
        fn test_press_enter_does_not_clear() {
            let driver = MockDriver::new().with_element(MockElement::css("#sb_form_q"));
            let mut session = session_with(driver);
            let result = session.press_enter(&Locator::css("#sb_form_q")).unwrap();
            assert_eq!(result.status(), "ENTER:#sb_form_q");
            assert!(!session.driver.was_called("clear:"));
        }

        #[test]
        fn test_select_status_and_value() {
            let driver = MockDriver::new().with_element(MockElement::css("#country"));
            let mut session = session_with(driver);
            let result = session.select(&Locator::css("#country"), "NL").unwrap();
            assert_eq!(result.status(), "SELECT:#country:NL");
            assert_eq!(session.driver.value_of("#country"), Some("NL"));
        }

        #[test]
        fn test_wait_for_visible_statuses() {
            let driver = MockDriver::new()
                .with_element(MockElement::css("#flash"))
                .with_element(MockElement::xpath("//div[@id='flash']"));
            let mut session = session_with(driver);
            assert_eq!(
                session.wait_for_visible(&Locator::css("#flash")).unwrap().status(),
                "WAIT_VISIBLE:#flash"
            );
            assert_eq!(
                session
                    .wait_for_visible_by_path("//div[@id='flash']")
                    .unwrap()
                    .status(),
                "WAIT_VISIBLE_XPATH://div[@id='flash']"
            );
        }

        #[test]
        fn test_action_retries_until_element_appears() {
            let driver =
                MockDriver::new().with_element(MockElement::css("#late").appears_after(2));
            let mut session = session_with(driver);
            let result = session.click(&Locator::css("#late"));
            assert!(result.is_ok());
        }
    }

    mod tolerant_action_tests {
        use super::*;

        #[test]
        fn test_try_click_miss_on_absent_element() {
            let mut session = session_with(MockDriver::new());
            let result = session.try_click(&Locator::css("#results-link")).unwrap();
            assert_eq!(result.status(), "TRY_CLICK:#results-link:MISS");
            assert!(result.is_miss());
        }

        #[test]
        fn test_try_click_by_path_miss_status() {
            let mut session = session_with(MockDriver::new());
            let result = session.try_click_by_path("//a[@id='missing']").unwrap();
            assert_eq!(result.status(), "TRY_CLICK_XPATH://a[@id='missing']:MISS");
        }

        #[test]
        fn test_try_click_success_uses_strict_status() {
            let driver = MockDriver::new().with_element(MockElement::css("#go"));
            let mut session = session_with(driver);
            let result = session.try_click(&Locator::css("#go")).unwrap();
            assert_eq!(result.status(), "CLICK:#go");
            assert!(!result.is_miss());
        }

        #[test]
        fn test_try_click_does_not_mask_state_error() {
            let mut session = session_with(MockDriver::new());
            session.release();
            let result = session.try_click(&Locator::css("#go"));
            assert!(matches!(result, Err(TimonelError::StateError { .. })));
        }
    }
}
