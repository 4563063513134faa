//! Locator value types for addressing page elements.
//!
//! A [`Locator`] pairs an addressing [`Scheme`] with a selector string. It is
//! an immutable value constructed per call; resolution against the live page
//! is deferred to the synchronizer, so a locator never holds a stale element.

use serde::{Deserialize, Serialize};

/// Addressing scheme for element lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// Structural CSS selector (e.g. `button.primary`)
    Css,
    /// Path expression (e.g. `//a[@id='link']`)
    XPath,
}

impl Scheme {
    /// Short tag used when composing status strings
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::XPath => "xpath",
        }
    }
}

/// Predicate the synchronizer polls for before an element is handed to an
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Element is present and rendered
    Visible,
    /// Element is visible and accepts pointer input
    Clickable,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visible => write!(f, "visible"),
            Self::Clickable => write!(f, "clickable"),
        }
    }
}

/// An addressing-scheme-plus-selector pair identifying a target element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    scheme: Scheme,
    selector: String,
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::Css,
            selector: selector.into(),
        }
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            scheme: Scheme::XPath,
            selector: selector.into(),
        }
    }

    /// Get the addressing scheme
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Get the raw selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod scheme_tests {
        use super::*;

        #[test]
        fn test_scheme_as_str() {
            assert_eq!(Scheme::Css.as_str(), "css");
            assert_eq!(Scheme::XPath.as_str(), "xpath");
        }

        #[test]
        fn test_scheme_equality() {
            assert_eq!(Scheme::Css, Scheme::Css);
            assert_ne!(Scheme::Css, Scheme::XPath);
        }
    }

    mod condition_tests {
        use super::*;

        #[test]
        fn test_condition_display() {
            assert_eq!(format!("{}", Condition::Visible), "visible");
            assert_eq!(format!("{}", Condition::Clickable), "clickable");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_css_locator() {
            let locator = Locator::css("button[type='submit']");
            assert_eq!(locator.scheme(), Scheme::Css);
            assert_eq!(locator.selector(), "button[type='submit']");
        }

        #[test]
        fn test_xpath_locator() {
            let locator = Locator::xpath("//a[@id='missing']");
            assert_eq!(locator.scheme(), Scheme::XPath);
            assert_eq!(locator.selector(), "//a[@id='missing']");
        }

        #[test]
        fn test_locator_display_is_raw_selector() {
            let locator = Locator::css("#flash");
            assert_eq!(locator.to_string(), "#flash");
        }

        #[test]
        fn test_locator_serde_round_trip() {
            let locator = Locator::xpath("//ol[@id='results']//h2");
            let json = serde_json::to_string(&locator).unwrap();
            let back: Locator = serde_json::from_str(&json).unwrap();
            assert_eq!(locator, back);
        }
    }
}
