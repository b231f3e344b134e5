//! HTML parsing for Skroutz item pages.
//!
//! An item page links each shop's offer through `/products/show/<id>`
//! anchors; the numeric product ids feed the bulk price endpoint.

use crate::skroutz::selectors;
use scraper::Html;
use tracing::{debug, trace};

/// Extracts product-offer hrefs from an item page, in document order.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let links: Vec<String> = document
        .select(&selectors::PRODUCT_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(String::from)
        .collect();

    debug!("Extracted {} product links", links.len());
    links
}

/// Extracts the numeric product id from an offer href, dropping any
/// query string first.
pub fn extract_product_id(href: &str) -> Option<u64> {
    let path = href.split('?').next().unwrap_or(href);
    let digits: String = path.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        trace!("No digits in href: {}", href);
        return None;
    }

    digits.parse().ok()
}

/// Full link-to-id pipeline for one item page. Hrefs without a numeric
/// id are skipped.
pub fn extract_product_ids(html: &str) -> Vec<u64> {
    extract_links(html).iter().filter_map(|href| extract_product_id(href)).collect()
}
