//! Extraction of the full record from a single detail page.

use scraper::Html;

use crate::fields;
use crate::models::AdDetail;
use crate::session::SessionDriver;
use crate::utils::error::{HarvestError, Result};

/// Navigates to a detail URL and parses the full record. Any failure here
/// (navigation, missing title, timeout) bubbles up; the caller decides
/// whether that drops the record or aborts the run.
pub fn fetch(driver: &SessionDriver, url: &str) -> Result<AdDetail> {
    driver.goto(url)?;
    driver.wait_for(fields::DETAIL_TITLE.selector)?;
    let html = driver.page_source()?;
    parse_detail_page(&html, url)
}

/// Parses detail page markup. The title is the one required field; all
/// others degrade to `None` or an empty list when the markup lacks them.
pub fn parse_detail_page(html: &str, url: &str) -> Result<AdDetail> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title =
        fields::extract(root, &fields::DETAIL_TITLE)?.ok_or(HarvestError::ElementNotFound {
            selector: fields::DETAIL_TITLE.selector.to_string(),
        })?;
    let description = fields::extract(root, &fields::DETAIL_DESCRIPTION)?;
    let price = fields::extract(root, &fields::DETAIL_PRICE)?;
    let location = fields::extract(root, &fields::DETAIL_LOCALITY)?;
    let date = fields::extract(root, &fields::DETAIL_DATE)?;

    let image_selector = fields::parse_selector(fields::DETAIL_IMAGE)?;
    let images: Vec<String> = document
        .select(&image_selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect();

    let attribute_selector = fields::parse_selector(fields::DETAIL_ATTRIBUTE)?;
    let value_selector = fields::parse_selector(fields::DETAIL_ATTRIBUTE_VALUE)?;
    let attributes: Vec<String> = document
        .select(&attribute_selector)
        .filter_map(|item| item.select(&value_selector).next())
        .map(fields::text_content)
        .collect();

    Ok(AdDetail {
        id: ad_id_from_url(url),
        title,
        description,
        price,
        location,
        date,
        images,
        attributes,
    })
}

/// The numeric ad id is the leading digits of the last URL path segment,
/// e.g. `/s-anzeige/knaus-suedwind/2468013579-220-1001` -> `2468013579`.
pub fn ad_id_from_url(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .split('-')
        .next()
        .unwrap_or_default()
        .to_string()
}
