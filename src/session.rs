use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::utils::error::{HarvestError, Result};

const CONSENT_WAIT: Duration = Duration::from_secs(5);
const CONSENT_SETTLE: Duration = Duration::from_secs(2);

/// One way of locating the consent banner's accept control.
enum ConsentTarget {
    Css(&'static str),
    XPath(&'static str),
}

/// Ordered by how reliably each variant of the banner markup has matched;
/// the first strategy that finds a clickable control wins.
const CONSENT_TARGETS: &[ConsentTarget] = &[
    ConsentTarget::Css("#gdpr-banner-accept"),
    ConsentTarget::Css("[data-testid='gdpr-banner-accept']"),
    ConsentTarget::XPath(
        "//button[@aria-label='Datenschutzbestimmungen und Einstellungen akzeptieren']",
    ),
    ConsentTarget::XPath("//*[@id='gdpr-banner-accept']"),
    ConsentTarget::XPath("//*[@data-testid='gdpr-banner-accept']"),
];

/// Owns the single browser session for the process lifetime. The Chrome
/// process is terminated when the driver drops, on every exit path.
pub struct SessionDriver {
    browser: Browser,
    tab: Arc<Tab>,
    wait_timeout: Duration,
    settle_delay: Duration,
}

impl SessionDriver {
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false) // Often needed in containerized environments
            .args(vec![
                std::ffi::OsStr::new("--disable-dev-shm-usage"),
                std::ffi::OsStr::new("--disable-gpu"),
                std::ffi::OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| HarvestError::Browser(format!("Failed to create launch options: {e}")))?;

        // Set Chrome path if provided
        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| HarvestError::Browser(format!("Failed to launch browser: {e}")))?;

        let tab = browser
            .new_tab()
            .map_err(|e| HarvestError::Browser(format!("Failed to create tab: {e}")))?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| HarvestError::Browser(format!("Failed to set user agent: {e}")))?;

        Ok(Self {
            browser,
            tab,
            wait_timeout: Duration::from_secs(config.wait_timeout_secs),
            settle_delay: Duration::from_secs(config.settle_delay_secs),
        })
    }

    pub fn process_id(&self) -> Option<u32> {
        self.browser.get_process_id()
    }

    pub fn goto(&self, url: &str) -> Result<()> {
        self.tab.navigate_to(url).map_err(|e| HarvestError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| HarvestError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    pub fn page_source(&self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| HarvestError::Browser(format!("Failed to get page content: {e}")))
    }

    /// Bounded wait for an element to appear in the live DOM.
    pub fn wait_for(&self, selector: &str) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, self.wait_timeout)
            .map(|_| ())
            .map_err(|_| HarvestError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    pub fn click_xpath(&self, xpath: &str) -> Result<()> {
        self.tab
            .wait_for_xpath_with_custom_timeout(xpath, self.wait_timeout)
            .and_then(|el| el.click().map(|_| ()))
            .map_err(|e| HarvestError::Browser(format!("Click on {xpath} failed: {e}")))
    }

    /// Fixed sleep used as a crude settle delay after page transitions.
    pub fn settle(&self) {
        thread::sleep(self.settle_delay);
    }

    /// Tries each consent banner strategy with a bounded wait and clicks
    /// the first match. A missing banner is not an error.
    pub fn dismiss_consent_banner(&self) {
        for target in CONSENT_TARGETS {
            let clicked = match target {
                ConsentTarget::Css(selector) => self
                    .tab
                    .wait_for_element_with_custom_timeout(selector, CONSENT_WAIT)
                    .and_then(|el| el.click().map(|_| ())),
                ConsentTarget::XPath(selector) => self
                    .tab
                    .wait_for_xpath_with_custom_timeout(selector, CONSENT_WAIT)
                    .and_then(|el| el.click().map(|_| ())),
            };

            if clicked.is_ok() {
                // Wait until the overlay is gone before interacting further
                thread::sleep(CONSENT_SETTLE);
                info!("Consent banner dismissed");
                return;
            }
            debug!("Consent banner strategy missed, trying next");
        }

        info!("No consent banner found, continuing");
    }

    /// Terminates the browser session. Dropping the driver has the same
    /// effect; this makes the release explicit on the happy path.
    pub fn close(self) {
        drop(self);
    }
}
