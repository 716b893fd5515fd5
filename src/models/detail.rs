use serde::{Deserialize, Serialize};

/// Full record parsed from a single detail page. Terminal form is one
/// CSV row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdDetail {
    /// Numeric ad id taken from the URL path segment.
    pub id: String,
    /// Title with status prefixes ("Reserviert – ", "Gelöscht – ") stripped.
    pub title: String,
    /// Description text with inline break markup converted to newlines.
    pub description: Option<String>,
    /// Raw price text as shown on the detail page, deliberately left
    /// unnormalized; the summary price is the filter key.
    pub price: Option<String>,
    pub location: Option<String>,
    pub date: Option<String>,
    /// Viewer image URLs in declaration order.
    pub images: Vec<String>,
    /// Attribute values in declaration order, labels discarded.
    pub attributes: Vec<String>,
}

impl AdDetail {
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
