//! Sequential orchestration of the whole crawl: index pages, threshold
//! filter, detail fetches, CSV export.

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::export;
use crate::extract::{detail, listing};
use crate::models::{AdDetail, AdSummary};
use crate::pagination::{Advance, Paginator};
use crate::session::SessionDriver;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub pages_scanned: u32,
    pub summaries: usize,
    pub matched: usize,
    pub exported: usize,
    pub dropped: usize,
}

pub struct Harvester {
    driver: SessionDriver,
    config: AppConfig,
}

impl Harvester {
    pub fn new(config: AppConfig) -> Result<Self> {
        let driver = SessionDriver::new(&config.browser)?;
        debug!("Browser session up (pid {:?})", driver.process_id());
        Ok(Self { driver, config })
    }

    /// Runs the full crawl. Consumes the harvester; the browser session is
    /// released before the export is written, and on error paths it is
    /// released when the harvester drops.
    pub fn run(self) -> Result<RunReport> {
        let crawl = self.config.crawl.clone();
        info!("Base URL: {}", crawl.base_url);
        info!("Page range: {}..={}", crawl.page_start, crawl.page_end);
        info!("Price threshold: {}", crawl.price_threshold);

        self.driver.goto(&crawl.base_url)?;
        self.driver.dismiss_consent_banner();

        let mut report = RunReport::default();
        let mut summaries: Vec<AdSummary> = Vec::new();
        let mut paginator = Paginator::new(crawl.page_start, crawl.page_end);

        loop {
            let ads = listing::collect(&self.driver)?;
            info!("Page {}: {} listings", paginator.current(), ads.len());
            summaries.extend(ads);
            report.pages_scanned += 1;

            if !paginator.has_remaining() {
                break;
            }
            match paginator.advance(&self.driver)? {
                Advance::Advanced => {}
                Advance::Exhausted => break,
            }
        }

        report.summaries = summaries.len();
        let matched = filter_by_threshold(summaries, crawl.price_threshold);
        report.matched = matched.len();
        info!(
            "{} of {} listings at or above threshold {}",
            report.matched, report.summaries, crawl.price_threshold
        );

        let mut details: Vec<AdDetail> = Vec::new();
        for ad in &matched {
            let Some(url) = ad.detail_url.as_deref() else {
                warn!("Listing {:?} has no detail URL, skipping", ad.title);
                report.dropped += 1;
                continue;
            };
            match detail::fetch(&self.driver, url) {
                Ok(record) => {
                    debug!("Fetched detail record {}", record.id);
                    details.push(record);
                }
                Err(e) if crawl.strict => return Err(e),
                Err(e) => {
                    warn!("Dropping {url}: {e}");
                    report.dropped += 1;
                }
            }
        }

        self.driver.close();

        // Whatever was gathered gets written, even an empty set
        export::write_csv(&details, &self.config.export.output_path)?;
        report.exported = details.len();
        Ok(report)
    }
}

/// The sole predicate deciding which listings enter the detail phase:
/// the summary's normalized price against the configured threshold,
/// inclusive.
pub fn filter_by_threshold(summaries: Vec<AdSummary>, threshold: u64) -> Vec<AdSummary> {
    summaries
        .into_iter()
        .filter(|ad| ad.meets_threshold(threshold))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str, price: u64) -> AdSummary {
        AdSummary {
            title: Some(title.to_string()),
            price,
            location: None,
            detail_url: Some(format!(
                "https://www.kleinanzeigen.de/s-anzeige/{}/123-220-1001",
                title.to_lowercase().replace(' ', "-")
            )),
        }
    }

    #[test]
    fn test_filter_keeps_at_and_above_threshold() {
        let summaries = vec![
            summary("Knaus", 42500),
            summary("Hobby", 30000),
            summary("Tabbert", 18000),
        ];

        let matched = filter_by_threshold(summaries, 30000);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].title.as_deref(), Some("Knaus"));
        assert_eq!(matched[1].title.as_deref(), Some("Hobby"));
    }

    #[test]
    fn test_filter_drops_zero_priced_listings() {
        let matched = filter_by_threshold(vec![summary("Geschenk", 0)], 1);
        assert!(matched.is_empty());
    }

    #[test]
    fn test_filter_with_zero_threshold_keeps_everything() {
        let summaries = vec![summary("Knaus", 42500), summary("Geschenk", 0)];
        assert_eq!(filter_by_threshold(summaries, 0).len(), 2);
    }
}
