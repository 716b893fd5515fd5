//! Advancing the session through the paginated listing index.

use scraper::Html;
use tracing::{info, warn};

use crate::fields;
use crate::session::SessionDriver;
use crate::utils::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Advanced,
    Exhausted,
}

/// Observed state of the control leading to a given page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextControl {
    Ready,
    Disabled,
    Missing,
}

/// State machine over the page index: either more pages remain or the
/// index is exhausted. Exhaustion before the configured end page is a
/// normal outcome, not an error.
pub struct Paginator {
    current: u32,
    end: u32,
}

impl Paginator {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            current: start,
            end,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn has_remaining(&self) -> bool {
        self.current < self.end
    }

    /// Clicks through to the next index page, or reports the index as
    /// exhausted when the control is missing, disabled, or fails to click.
    pub fn advance(&mut self, driver: &SessionDriver) -> Result<Advance> {
        let next = self.current + 1;
        let html = driver.page_source()?;

        match next_control(&html, next)? {
            NextControl::Missing => {
                info!("No control for page {next}, index exhausted");
                Ok(Advance::Exhausted)
            }
            NextControl::Disabled => {
                info!("Control for page {next} is disabled, index exhausted");
                Ok(Advance::Exhausted)
            }
            NextControl::Ready => {
                if let Err(e) = driver.click_xpath(&page_button_xpath(next)) {
                    warn!("Failed to open page {next}: {e}");
                    return Ok(Advance::Exhausted);
                }
                driver.settle();
                self.current = next;
                Ok(Advance::Advanced)
            }
        }
    }
}

/// Inspects index page markup for the numbered control leading to `page`.
pub fn next_control(html: &str, page: u32) -> Result<NextControl> {
    let document = Html::parse_document(html);
    let selector = fields::parse_selector(fields::NEXT_PAGE_BUTTON)?;
    let label = page.to_string();

    let button = document
        .select(&selector)
        .find(|b| fields::text_content(*b) == label);

    Ok(match button {
        None => NextControl::Missing,
        Some(b) if b.value().attr("disabled").is_some() => NextControl::Disabled,
        Some(b)
            if b.value()
                .attr("class")
                .is_some_and(|c| c.contains("is-disabled")) =>
        {
            NextControl::Disabled
        }
        Some(_) => NextControl::Ready,
    })
}

fn page_button_xpath(page: u32) -> String {
    format!(
        "//button[contains(concat(' ', normalize-space(@class), ' '), ' Page ') and normalize-space(text())='{page}']"
    )
}
