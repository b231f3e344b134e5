//! HTTP client for Skroutz requests using wreq for TLS fingerprint emulation.

use crate::basket::ShopPriceMap;
use crate::config::Config;
use crate::skroutz::models::ProductPrice;
use crate::skroutz::parser;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, trace, warn};
use wreq::Client;
use wreq_util::Emulation;

const SKROUTZ_BASE: &str = "https://www.skroutz.gr";

/// Trait for per-item price fetching - enables mocking for tests.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches the shop → net unit price map for one item key.
    async fn fetch_shop_prices(&self, item_key: &str) -> Result<ShopPriceMap>;
}

/// Skroutz HTTP client with browser impersonation and request pacing.
pub struct SkroutzClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    only_direct_purchase: bool,
    base_url: Option<String>,
}

impl SkroutzClient {
    /// Creates a new Skroutz client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new Skroutz client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            only_direct_purchase: config.only_direct_purchase,
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or the live site).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| SKROUTZ_BASE.to_string())
    }

    /// Fetches the HTML of one item page.
    async fn get_page(&self, item_key: &str) -> Result<String> {
        self.delay().await;

        let url = format!("{}/s/{}", self.base_url(), encode_item_path(item_key));
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "el-GR,el;q=0.9,en;q=0.8")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider increasing --delay.");
            anyhow::bail!("Rate limited by Skroutz. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Bulk-fetches offer prices for the given product ids.
    async fn get_prices(&self, product_ids: &[u64]) -> Result<HashMap<String, ProductPrice>> {
        self.delay().await;

        let url = format!("{}/personalization/product_prices.json", self.base_url());
        debug!("POST {} ({} product ids)", url, product_ids.len());

        let body = serde_json::json!({
            "active_sizes": [],
            "product_ids": product_ids,
        });

        let response = self
            .client
            .post(&url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .context("Failed to send price request")?;

        let status = response.status();
        if status == 503 {
            anyhow::bail!("Rate limited by Skroutz. Try increasing --delay or using a proxy.");
        }
        if !status.is_success() {
            anyhow::bail!("Price request failed with status: {}", status);
        }

        let text = response.text().await.context("Failed to read price response body")?;
        serde_json::from_str(&text).context("Malformed price response")
    }

    /// Adds a paced delay with random jitter between requests.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

/// Percent-encodes an item slug for use as a URL path, segment by
/// segment. Slugs contain Greek characters and an embedded '/' that
/// separates the numeric id from the page name.
fn encode_item_path(item_key: &str) -> String {
    item_key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl PriceSource for SkroutzClient {
    async fn fetch_shop_prices(&self, item_key: &str) -> Result<ShopPriceMap> {
        info!("Fetching prices for: {}", item_key);

        let html = self.get_page(item_key).await?;
        let product_ids = parser::extract_product_ids(&html);

        if product_ids.is_empty() {
            warn!("No product offers found for '{}'", item_key);
            return Ok(ShopPriceMap::new());
        }

        let offers = self.get_prices(&product_ids).await?;

        let mut shop_prices = ShopPriceMap::new();
        for id in &product_ids {
            let Some(offer) = offers.get(&id.to_string()) else {
                trace!("No price entry for product id {}", id);
                continue;
            };

            if self.only_direct_purchase && !offer.is_direct_purchase() {
                trace!("Skipping non-direct offer from shop {}", offer.shop_id);
                continue;
            }

            shop_prices.insert(offer.shop_id.to_string(), offer.net_price);
        }

        debug!("{} shops price '{}'", shop_prices.len(), item_key);
        Ok(shop_prices)
    }
}
