//! Site markup contract: every element identifier the extractors depend on
//! lives here, paired with its normalization function. The classifieds site
//! can change ids and classes without notice, so markup churn should touch
//! this table and nothing else.

use scraper::{ElementRef, Html, Selector};

use crate::utils::error::{HarvestError, Result};

pub const SITE_ORIGIN: &str = "https://www.kleinanzeigen.de";

pub type Normalize = fn(ElementRef<'_>) -> String;

/// One extractable field: where it lives and how its text is cleaned up.
pub struct FieldRule {
    pub name: &'static str,
    pub selector: &'static str,
    pub normalize: Normalize,
}

// Listing-index page
pub const LISTING_ITEM: &str = "li.ad-listitem";
pub const LISTING_LINK: &str = "a.ellipsis";

pub const SUMMARY_TITLE: FieldRule = FieldRule {
    name: "title",
    selector: "div.Title.Title-h3",
    normalize: text_content,
};

pub const SUMMARY_PRICE: FieldRule = FieldRule {
    name: "price",
    selector: "p.aditem-main--middle--price",
    normalize: text_content,
};

pub const SUMMARY_LOCATION: FieldRule = FieldRule {
    name: "location",
    selector: "div.aditem-main--top--left",
    normalize: text_content,
};

// Detail page
pub const DETAIL_TITLE: FieldRule = FieldRule {
    name: "title",
    selector: "h1#viewad-title",
    normalize: title_text,
};

pub const DETAIL_PRICE: FieldRule = FieldRule {
    name: "price",
    selector: "h2#viewad-price",
    normalize: text_content,
};

pub const DETAIL_DESCRIPTION: FieldRule = FieldRule {
    name: "description",
    selector: "p#viewad-description-text",
    normalize: paragraph_text,
};

pub const DETAIL_LOCALITY: FieldRule = FieldRule {
    name: "location",
    selector: "span#viewad-locality",
    normalize: text_content,
};

pub const DETAIL_DATE: FieldRule = FieldRule {
    name: "date",
    selector: "#viewad-extra-info div span",
    normalize: text_content,
};

pub const DETAIL_IMAGE: &str = "img#viewad-image";
pub const DETAIL_ATTRIBUTE: &str = "li.addetailslist--detail";
pub const DETAIL_ATTRIBUTE_VALUE: &str = "span.addetailslist--detail--value";

// Pagination
pub const NEXT_PAGE_BUTTON: &str = "button.Page";

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector(format!("{selector}: {e}")))
}

/// Applies a field rule under `scope`, returning `None` when the element is
/// absent or its normalized text is empty. A missing field is ordinary page
/// variance, not an error.
pub fn extract(scope: ElementRef<'_>, rule: &FieldRule) -> Result<Option<String>> {
    let selector = parse_selector(rule.selector)?;
    Ok(scope
        .select(&selector)
        .next()
        .map(|el| (rule.normalize)(el))
        .filter(|text| !text.is_empty()))
}

/// Whitespace-joined, trimmed text of an element.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").trim().to_string()
}

fn title_text(el: ElementRef<'_>) -> String {
    strip_status_prefix(&text_content(el))
}

/// Inner HTML with `<br>` variants turned into literal newlines and all
/// remaining markup dropped.
fn paragraph_text(el: ElementRef<'_>) -> String {
    let html = el
        .inner_html()
        .replace("<br />", "\n")
        .replace("<br/>", "\n")
        .replace("<br>", "\n");
    let fragment = Html::parse_fragment(&html);
    fragment
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Removes leading status markers like "Reserviert – " from a title. Only
/// prefixes at the start of the string are stripped, whatever separator
/// glyph the markup used; a status word mid-string is left alone.
pub fn strip_status_prefix(title: &str) -> String {
    const STATUS_PREFIXES: [&str; 4] = ["Reserviert", "Gelöscht", "Reserved", "Deleted"];
    const SEPARATORS: [char; 3] = ['–', '—', '-'];

    let mut current = title.trim();
    'outer: loop {
        for prefix in STATUS_PREFIXES {
            if let Some(rest) = current.strip_prefix(prefix) {
                let rest = rest.trim_start();
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    if SEPARATORS.contains(&c) {
                        current = chars.as_str().trim_start();
                        continue 'outer;
                    }
                }
            }
        }
        break;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_all_css_selectors_parse() {
        let selectors = [
            LISTING_ITEM,
            LISTING_LINK,
            SUMMARY_TITLE.selector,
            SUMMARY_PRICE.selector,
            SUMMARY_LOCATION.selector,
            DETAIL_TITLE.selector,
            DETAIL_PRICE.selector,
            DETAIL_DESCRIPTION.selector,
            DETAIL_LOCALITY.selector,
            DETAIL_DATE.selector,
            DETAIL_IMAGE,
            DETAIL_ATTRIBUTE,
            DETAIL_ATTRIBUTE_VALUE,
            NEXT_PAGE_BUTTON,
        ];

        for selector in selectors {
            assert!(
                parse_selector(selector).is_ok(),
                "selector '{selector}' should parse"
            );
        }
    }

    #[test]
    fn test_extract_present_field() {
        let html = r#"<li class="ad-listitem"><div class="Title Title-h3">  Hymer B-Klasse  </div></li>"#;
        let fragment = Html::parse_fragment(html);
        let item_selector = parse_selector(LISTING_ITEM).unwrap();
        let item = fragment.select(&item_selector).next().unwrap();

        let title = extract(item, &SUMMARY_TITLE).unwrap();
        assert_eq!(title, Some("Hymer B-Klasse".to_string()));
    }

    #[test]
    fn test_extract_absent_field_is_none() {
        let html = r#"<li class="ad-listitem"><p>no title here</p></li>"#;
        let fragment = Html::parse_fragment(html);
        let item_selector = parse_selector(LISTING_ITEM).unwrap();
        let item = fragment.select(&item_selector).next().unwrap();

        assert_eq!(extract(item, &SUMMARY_TITLE).unwrap(), None);
    }

    #[test]
    fn test_extract_empty_field_is_none() {
        let html = r#"<li class="ad-listitem"><div class="Title Title-h3">   </div></li>"#;
        let fragment = Html::parse_fragment(html);
        let item_selector = parse_selector(LISTING_ITEM).unwrap();
        let item = fragment.select(&item_selector).next().unwrap();

        assert_eq!(extract(item, &SUMMARY_TITLE).unwrap(), None);
    }

    #[test]
    fn test_paragraph_text_converts_breaks() {
        let html = r#"<p id="viewad-description-text">Top Zustand.<br>Erstzulassung 2019.<br/>Keine Haustiere.</p>"#;
        let fragment = Html::parse_fragment(html);
        let selector = parse_selector(DETAIL_DESCRIPTION.selector).unwrap();
        let el = fragment.select(&selector).next().unwrap();

        assert_eq!(
            paragraph_text(el),
            "Top Zustand.\nErstzulassung 2019.\nKeine Haustiere."
        );
    }

    #[test]
    fn test_paragraph_text_drops_inline_markup() {
        let html =
            r#"<p id="viewad-description-text"><b>Unfallfrei</b>, scheckheftgepflegt.</p>"#;
        let fragment = Html::parse_fragment(html);
        let selector = parse_selector(DETAIL_DESCRIPTION.selector).unwrap();
        let el = fragment.select(&selector).next().unwrap();

        assert_eq!(paragraph_text(el), "Unfallfrei, scheckheftgepflegt.");
    }

    #[rstest]
    #[case("Reserviert – 2010 Camper", "2010 Camper")]
    #[case("Gelöscht – 2010 Camper", "2010 Camper")]
    #[case("Reserved – 2010 Camper", "2010 Camper")]
    #[case("Deleted – 2010 Camper", "2010 Camper")]
    #[case("Reserviert — 2010 Camper", "2010 Camper")]
    #[case("Reserviert - 2010 Camper", "2010 Camper")]
    #[case("Reserviert-2010 Camper", "2010 Camper")]
    #[case("Gelöscht – Reserviert – 2010 Camper", "2010 Camper")]
    fn test_status_prefix_is_stripped(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_status_prefix(input), expected);
    }

    #[rstest]
    #[case("2010 Camper Reserved Model")]
    #[case("2010 Camper – Reserviert")]
    #[case("Reservierter Stellplatz")]
    #[case("Reserviert")]
    fn test_non_prefix_occurrence_is_kept(#[case] input: &str) {
        assert_eq!(strip_status_prefix(input), input);
    }

    #[test]
    fn test_text_content_joins_nested_nodes() {
        let html = r#"<div class="aditem-main--top--left"><i class="icon"></i> 48477  Hörstel</div>"#;
        let fragment = Html::parse_fragment(html);
        let selector = parse_selector(SUMMARY_LOCATION.selector).unwrap();
        let el = fragment.select(&selector).next().unwrap();

        assert_eq!(text_content(el), "48477  Hörstel");
    }
}
