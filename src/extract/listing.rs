//! Extraction of summary records from a loaded listing-index page.

use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;
use tracing::warn;

use crate::fields;
use crate::models::AdSummary;
use crate::session::SessionDriver;
use crate::utils::error::Result;

/// Reads all ad summaries off the currently loaded index page. Waits for
/// the first listing item before parsing so a partially rendered DOM is
/// not read; on timeout the page is still parsed and simply yields
/// whatever is there.
pub fn collect(driver: &SessionDriver) -> Result<Vec<AdSummary>> {
    if let Err(e) = driver.wait_for(fields::LISTING_ITEM) {
        warn!("Listing items did not appear in time: {e}");
    }
    let html = driver.page_source()?;
    parse_listing_page(&html)
}

/// Parses index page markup into summary records. A missing field never
/// drops the listing: partial data is preferred, so absent title/location/
/// URL become `None` and an absent price becomes 0.
pub fn parse_listing_page(html: &str) -> Result<Vec<AdSummary>> {
    let document = Html::parse_document(html);
    let item_selector = fields::parse_selector(fields::LISTING_ITEM)?;
    let link_selector = fields::parse_selector(fields::LISTING_LINK)?;

    let mut ads = Vec::new();
    for item in document.select(&item_selector) {
        let title = fields::extract(item, &fields::SUMMARY_TITLE)?;
        let price = fields::extract(item, &fields::SUMMARY_PRICE)?
            .map(|raw| parse_price(&raw))
            .unwrap_or(0);
        let location = fields::extract(item, &fields::SUMMARY_LOCATION)?;
        let detail_url = item
            .select(&link_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(absolute_url);

        ads.push(AdSummary {
            title,
            price,
            location,
            detail_url,
        });
    }

    Ok(ads)
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", fields::SITE_ORIGIN, href)
    }
}

/// Normalizes a raw price string to an integer: thousands separators, the
/// currency symbol and the negotiable marker ("VB") are stripped, then the
/// first run of digits is read as base-10. No digits means 0.
pub fn parse_price(raw: &str) -> u64 {
    let cleaned = raw.replace('.', "").replace('€', "").replace("VB", "");
    match digit_run().find(&cleaned) {
        Some(m) => m.as_str().parse().unwrap_or(0),
        None => 0,
    }
}

fn digit_run() -> &'static Regex {
    static DIGIT_RUN: OnceLock<Regex> = OnceLock::new();
    DIGIT_RUN.get_or_init(|| Regex::new(r"\d+").unwrap())
}
