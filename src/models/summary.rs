use serde::{Deserialize, Serialize};

/// Condensed entry from a listing-index page. Fields the page did not
/// provide stay `None`; an absent or unparseable price is 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdSummary {
    pub title: Option<String>,
    pub price: u64,
    pub location: Option<String>,
    pub detail_url: Option<String>,
}

impl AdSummary {
    /// Threshold membership is decided on the normalized summary price,
    /// never on the detail page's raw price string. The bound is inclusive.
    pub fn meets_threshold(&self, threshold: u64) -> bool {
        self.price >= threshold
    }
}
