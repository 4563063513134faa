//! Real browser control over the Chrome `DevTools` Protocol.
//!
//! [`ChromiumDriver`] implements [`WebDriver`] on top of chromiumoxide,
//! bridging the facade's blocking contract onto an owned Tokio runtime. Only
//! compiled with the `browser` feature; unit tests of the facade use
//! [`crate::driver::MockDriver`] instead.

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde_json::Value;
use tracing::debug;

use crate::driver::{ElementHandle, WebDriver};
use crate::locator::{Condition, Locator, Scheme};
use crate::result::{TimonelError, TimonelResult};

/// Launch options for the CDP-backed driver
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 800,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

fn driver_error(e: impl std::fmt::Display) -> TimonelError {
    TimonelError::DriverError {
        message: e.to_string(),
    }
}

const VISIBLE_JS: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none'; \
}";

const CLICKABLE_JS: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none' \
        && !this.disabled && style.pointerEvents !== 'none'; \
}";

/// CDP-backed driver with a real browser connection.
///
/// Owns its Tokio runtime; every trait method blocks the calling thread until
/// the browser responds, matching the facade's scheduling model.
#[derive(Debug)]
pub struct ChromiumDriver {
    runtime: tokio::runtime::Runtime,
    browser: CdpBrowser,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    next_handle: u64,
    // Element from the most recent successful probe; handles are scoped to a
    // single resolve-then-act sequence so one slot suffices.
    resolved: Option<(String, Element)>,
}

impl ChromiumDriver {
    /// Launch a browser and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime, browser, or page cannot be brought
    /// up.
    pub fn launch(options: &BrowserOptions) -> TimonelResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let mut builder = CdpConfig::builder()
            .window_size(options.viewport_width, options.viewport_height);
        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(driver_error)?;

        let (browser, page, handler) = runtime.block_on(async {
            let (browser, mut events) = CdpBrowser::launch(config).await.map_err(driver_error)?;
            let handler = tokio::spawn(async move {
                while let Some(event) = events.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser
                .new_page("about:blank")
                .await
                .map_err(driver_error)?;
            Ok::<_, TimonelError>((browser, page, handler))
        })?;

        Ok(Self {
            runtime,
            browser,
            page,
            handler,
            next_handle: 0,
            resolved: None,
        })
    }

    fn element_for(&self, handle: &ElementHandle) -> TimonelResult<&Element> {
        match self.resolved {
            Some((ref id, ref element)) if *id == handle.id => Ok(element),
            _ => Err(TimonelError::DriverError {
                message: format!("stale element handle: {}", handle.id),
            }),
        }
    }

    fn eval_bool(&self, element: &Element, js: &str) -> TimonelResult<bool> {
        let returns = self
            .runtime
            .block_on(element.call_js_fn(js, false))
            .map_err(driver_error)?;
        Ok(returns
            .result
            .value
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false))
    }
}

impl WebDriver for ChromiumDriver {
    fn goto(&mut self, url: &str) -> TimonelResult<()> {
        let page = &self.page;
        self.runtime
            .block_on(page.goto(url))
            .map(|_| ())
            .map_err(|e| TimonelError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    fn current_url(&mut self) -> TimonelResult<String> {
        let page = &self.page;
        let url = self.runtime.block_on(page.url()).map_err(driver_error)?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    fn title(&mut self) -> TimonelResult<String> {
        let page = &self.page;
        let title = self
            .runtime
            .block_on(page.get_title())
            .map_err(driver_error)?;
        Ok(title.unwrap_or_default())
    }

    fn probe(
        &mut self,
        locator: &Locator,
        condition: Condition,
    ) -> TimonelResult<Option<ElementHandle>> {
        let page = &self.page;
        let lookup = self.runtime.block_on(async {
            match locator.scheme() {
                Scheme::Css => page.find_element(locator.selector()).await,
                Scheme::XPath => page.find_xpath(locator.selector()).await,
            }
        });
        // Lookup failure means "not there yet"; the synchronizer retries it
        // until the session timeout.
        let Ok(element) = lookup else {
            return Ok(None);
        };
        let js = match condition {
            Condition::Visible => VISIBLE_JS,
            Condition::Clickable => CLICKABLE_JS,
        };
        if !self.eval_bool(&element, js)? {
            return Ok(None);
        }
        self.next_handle += 1;
        let id = format!("element-{}", self.next_handle);
        debug!(selector = %locator, handle = %id, "element resolved");
        self.resolved = Some((id.clone(), element));
        Ok(Some(ElementHandle::new(id)))
    }

    fn click(&mut self, handle: &ElementHandle) -> TimonelResult<()> {
        let element = self.element_for(handle)?;
        self.runtime
            .block_on(element.click())
            .map(|_| ())
            .map_err(driver_error)
    }

    fn clear(&mut self, handle: &ElementHandle) -> TimonelResult<()> {
        let element = self.element_for(handle)?;
        self.runtime
            .block_on(element.call_js_fn(
                "function() { this.value = ''; \
                 this.dispatchEvent(new Event('input', { bubbles: true })); }",
                false,
            ))
            .map(|_| ())
            .map_err(driver_error)
    }

    fn send_text(&mut self, handle: &ElementHandle, text: &str) -> TimonelResult<()> {
        let element = self.element_for(handle)?;
        self.runtime
            .block_on(async {
                element.focus().await?;
                element.type_str(text).await
            })
            .map(|_| ())
            .map_err(driver_error)
    }

    fn press_enter(&mut self, handle: &ElementHandle) -> TimonelResult<()> {
        let element = self.element_for(handle)?;
        self.runtime
            .block_on(async {
                element.focus().await?;
                element.press_key("Enter").await
            })
            .map(|_| ())
            .map_err(driver_error)
    }

    fn read_text(&mut self, handle: &ElementHandle) -> TimonelResult<String> {
        let element = self.element_for(handle)?;
        let text = self
            .runtime
            .block_on(element.inner_text())
            .map_err(driver_error)?;
        Ok(text.unwrap_or_default())
    }

    fn select_value(&mut self, handle: &ElementHandle, value: &str) -> TimonelResult<()> {
        let element = self.element_for(handle)?;
        // call_js_fn takes no arguments, so the value is quoted into the body
        let quoted = serde_json::to_string(value).map_err(driver_error)?;
        let js = format!(
            "function() {{ this.value = {quoted}; \
             this.dispatchEvent(new Event('change', {{ bubbles: true }})); }}"
        );
        self.runtime
            .block_on(element.call_js_fn(js, false))
            .map(|_| ())
            .map_err(driver_error)
    }

    fn screenshot_bytes(&mut self) -> TimonelResult<Vec<u8>> {
        let page = &self.page;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let response = self
            .runtime
            .block_on(page.execute(params))
            .map_err(driver_error)?;
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&response.data)
            .map_err(driver_error)
    }

    fn quit(&mut self) -> TimonelResult<()> {
        self.resolved = None;
        let browser = &mut self.browser;
        self.runtime
            .block_on(browser.close())
            .map_err(driver_error)?;
        self.handler.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_options_defaults() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert!(options.sandbox);
        assert_eq!(options.viewport_width, 1280);
    }

    #[test]
    fn test_browser_options_builder() {
        let options = BrowserOptions::default()
            .with_headless(false)
            .with_viewport(800, 600)
            .with_no_sandbox()
            .with_chromium_path("/usr/bin/chromium");
        assert!(!options.headless);
        assert!(!options.sandbox);
        assert_eq!(options.viewport_height, 600);
        assert_eq!(options.chromium_path.as_deref(), Some("/usr/bin/chromium"));
    }
}
