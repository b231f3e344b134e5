//! Basket command implementation: fetch, aggregate, select, format.

use crate::basket::{self, ItemData};
use crate::config::{Config, ShoppingList};
use crate::format::Formatter;
use crate::skroutz::{PriceSource, SkroutzClient};
use anyhow::{Context, Result};
use tracing::{debug, info};

/// Runs the full cheapest-shop computation for a shopping list.
pub struct BasketCommand {
    config: Config,
}

impl BasketCommand {
    /// Creates a new basket command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches prices for the whole list and returns the formatted ranking.
    pub async fn execute(&self, list: &ShoppingList) -> Result<String> {
        let client = SkroutzClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_source(&client, list).await
    }

    /// Runs the computation with a provided price source (for testing).
    pub async fn execute_with_source(
        &self,
        source: &impl PriceSource,
        list: &ShoppingList,
    ) -> Result<String> {
        list.validate()?;

        info!("Pricing {} items across shops", list.len());

        // Sequential, in list order. Any fetch failure aborts the run.
        let mut item_data = ItemData::new();
        for item_key in list.keys() {
            let prices = source
                .fetch_shop_prices(&item_key)
                .await
                .with_context(|| format!("Failed to fetch prices for '{}'", item_key))?;

            debug!("'{}' priced by {} shops", item_key, prices.len());
            item_data.insert(item_key, prices);
        }

        let quantities = list.quantities();
        let shop_totals = basket::aggregate(&item_data, &quantities)?;
        let ranked = basket::select_cheapest(&shop_totals, list.len() as u32);

        info!("{} shop(s) stock the full list", ranked.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_ranking(&ranked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::ShopPriceMap;
    use crate::config::{ListItem, OutputFormat};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Mock price source backed by a fixed item → shop → price table.
    struct MockPriceSource {
        data: BTreeMap<String, ShopPriceMap>,
        call_count: Arc<AtomicU32>,
        fail_on: Option<String>,
    }

    impl MockPriceSource {
        fn new(data: BTreeMap<String, ShopPriceMap>) -> Self {
            Self { data, call_count: Arc::new(AtomicU32::new(0)), fail_on: None }
        }

        fn failing_on(mut self, item: &str) -> Self {
            self.fail_on = Some(item.to_string());
            self
        }

        fn calls(&self) -> u32 {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceSource for MockPriceSource {
        async fn fetch_shop_prices(&self, item_key: &str) -> Result<ShopPriceMap> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            if self.fail_on.as_deref() == Some(item_key) {
                anyhow::bail!("simulated fetch failure");
            }

            Ok(self.data.get(item_key).cloned().unwrap_or_default())
        }
    }

    fn make_test_config() -> Config {
        Config {
            proxy: None,
            delay_ms: 0,
            delay_jitter_ms: 0,
            only_direct_purchase: false,
            format: OutputFormat::Table,
        }
    }

    fn make_list(entries: &[(&str, u32)]) -> ShoppingList {
        ShoppingList {
            items: entries
                .iter()
                .map(|(name, quantity)| ListItem { name: name.to_string(), quantity: *quantity })
                .collect(),
        }
    }

    fn prices(entries: &[(&str, f64)]) -> ShopPriceMap {
        entries.iter().map(|(shop, price)| (shop.to_string(), *price)).collect()
    }

    fn reference_source() -> MockPriceSource {
        let mut data = BTreeMap::new();
        data.insert(
            "item1".to_string(),
            prices(&[("shop1", 1.11), ("shop2", 2.22), ("shop3", 7.25)]),
        );
        data.insert(
            "item2".to_string(),
            prices(&[("shop1", 31.50), ("shop2", 22.22), ("shop4", 17.25)]),
        );
        data.insert(
            "item3".to_string(),
            prices(&[("shop1", 10.0), ("shop2", 11.0), ("shop5", 27.25), ("shop6", 28.27)]),
        );
        MockPriceSource::new(data)
    }

    #[tokio::test]
    async fn test_basket_reference_scenario() {
        let source = reference_source();
        let list = make_list(&[("item1", 1), ("item2", 2), ("item3", 1)]);
        let cmd = BasketCommand::new(make_test_config());

        let output = cmd.execute_with_source(&source, &list).await.unwrap();

        assert!(output.contains("shop2"));
        assert!(output.contains("57.66"));
        assert!(output.contains("shop1"));
        assert!(output.contains("74.11"));
        // Partial shops are filtered out
        assert!(!output.contains("shop3"));
        assert!(!output.contains("shop4"));
        // Cheapest shop first
        assert!(output.find("shop2").unwrap() < output.find("shop1").unwrap());

        // One fetch per item, no more
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn test_basket_no_qualifying_shop() {
        let mut data = BTreeMap::new();
        data.insert("item1".to_string(), prices(&[("shop1", 1.0)]));
        data.insert("item2".to_string(), prices(&[("shop2", 2.0)]));
        let source = MockPriceSource::new(data);

        let list = make_list(&[("item1", 1), ("item2", 1)]);
        let cmd = BasketCommand::new(make_test_config());

        let output = cmd.execute_with_source(&source, &list).await.unwrap();
        assert_eq!(output, "No shop stocks the full list.");
    }

    #[tokio::test]
    async fn test_basket_fetch_failure_aborts() {
        let source = reference_source().failing_on("item2");
        let list = make_list(&[("item1", 1), ("item2", 2), ("item3", 1)]);
        let cmd = BasketCommand::new(make_test_config());

        let err = cmd.execute_with_source(&source, &list).await.unwrap_err();
        assert!(err.to_string().contains("item2"));
        // Aborts immediately, item3 is never fetched
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_basket_rejects_invalid_list() {
        let source = reference_source();
        let list = make_list(&[("item1", 1), ("item1", 2)]);
        let cmd = BasketCommand::new(make_test_config());

        let err = cmd.execute_with_source(&source, &list).await.unwrap_err();
        assert!(err.to_string().contains("Duplicate item"));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_basket_json_format() {
        let source = reference_source();
        let list = make_list(&[("item1", 1), ("item2", 2), ("item3", 1)]);

        let mut config = make_test_config();
        config.format = OutputFormat::Json;
        let cmd = BasketCommand::new(config);

        let output = cmd.execute_with_source(&source, &list).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["shop"], "shop2");
        assert_eq!(parsed[0]["total_items"], 3);
        assert_eq!(parsed[1]["shop"], "shop1");
    }

    #[tokio::test]
    async fn test_basket_item_with_no_sellers() {
        // An item nobody sells yields an empty map, so no shop qualifies
        let mut data = BTreeMap::new();
        data.insert("item1".to_string(), prices(&[("shop1", 1.0)]));
        data.insert("ghost".to_string(), ShopPriceMap::new());
        let source = MockPriceSource::new(data);

        let list = make_list(&[("item1", 1), ("ghost", 1)]);
        let cmd = BasketCommand::new(make_test_config());

        let output = cmd.execute_with_source(&source, &list).await.unwrap();
        assert_eq!(output, "No shop stocks the full list.");
    }
}
