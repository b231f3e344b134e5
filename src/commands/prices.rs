//! Single-item price listing command.

use crate::config::Config;
use crate::format::Formatter;
use crate::skroutz::{PriceSource, SkroutzClient};
use anyhow::{Context, Result};
use tracing::info;

/// Lists every shop's price for a single item key.
pub struct PricesCommand {
    config: Config,
}

impl PricesCommand {
    /// Creates a new prices command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches prices for one item and returns formatted output.
    pub async fn execute(&self, item_key: &str) -> Result<String> {
        let client = SkroutzClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_source(&client, item_key).await
    }

    /// Fetches prices with a provided source (for testing).
    pub async fn execute_with_source(
        &self,
        source: &impl PriceSource,
        item_key: &str,
    ) -> Result<String> {
        let item_key = item_key.trim();
        if item_key.is_empty() {
            anyhow::bail!("Item key must not be empty");
        }

        info!("Listing shop prices for: {}", item_key);

        let prices = source.fetch_shop_prices(item_key).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_shop_prices(item_key, &prices))
    }
}
