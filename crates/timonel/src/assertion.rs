//! Text assertion against a resolved element.

use crate::driver::WebDriver;
use crate::locator::{Condition, Locator};
use crate::result::{TimonelError, TimonelResult};
use crate::session::Session;
use crate::ActionResult;

impl<D: WebDriver> Session<D> {
    /// Wait until the element is visible, read its rendered text, and fail
    /// unless the text contains `expected` as a literal, case-sensitive
    /// substring.
    ///
    /// This is the one operation whose failure is a semantic test failure
    /// rather than an infrastructure one. The facade never absorbs it; the
    /// caller decides disposition. The error carries both the expected
    /// substring and the observed text verbatim.
    ///
    /// # Errors
    ///
    /// `AssertionFailed` on a mismatch; `Timeout` if the element never
    /// becomes visible.
    pub fn assert_text(
        &mut self,
        locator: &Locator,
        expected: &str,
    ) -> TimonelResult<ActionResult> {
        let handle = self.locate(locator, Condition::Visible)?;
        let actual = self.driver.read_text(&handle)?;
        if !actual.contains(expected) {
            return Err(TimonelError::AssertionFailed {
                selector: locator.selector().to_string(),
                expected: expected.to_string(),
                actual,
            });
        }
        Ok(ActionResult::success(format!(
            "ASSERT_TEXT:{locator}:{expected}"
        )))
    }
}
