//! CSS selectors for Skroutz HTML parsing.
//!
//! Update this file when Skroutz changes their HTML structure.

use scraper::Selector;
use std::sync::LazyLock;

/// Anchors pointing at product offer pages on a search/category page.
pub static PRODUCT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href^='/products/show']").unwrap());
