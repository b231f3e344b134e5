//! Basket aggregation and cheapest-shop selection.
//!
//! Pure functions over the per-item price data collected by the Skroutz
//! client. No I/O happens here, which keeps the interesting logic fully
//! unit-testable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Shop identifier as reported by Skroutz (stringified shop id).
pub type ShopId = String;

/// Item identifier: the product page slug from the shopping list.
pub type ItemKey = String;

/// Per-item mapping from shop to net unit price. Shops that don't sell
/// the item are simply absent.
pub type ShopPriceMap = BTreeMap<ShopId, f64>;

/// Full price data for the shopping list, one entry per item.
pub type ItemData = BTreeMap<ItemKey, ShopPriceMap>;

/// Errors from the aggregation step.
#[derive(Debug, Error)]
pub enum BasketError {
    /// An item showed up in the price data without a quantity entry.
    /// Callers build quantities from the same list they fetch, so this
    /// indicates a bug or a malformed shopping list.
    #[error("no quantity configured for item '{0}'")]
    MissingQuantity(ItemKey),
}

/// Running totals for a single shop across the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopTotal {
    /// Number of distinct list items this shop stocks, each counted
    /// once regardless of quantity.
    pub total_items: u32,
    /// Sum of quantity × unit price over the items the shop stocks.
    pub total_price: f64,
}

impl ShopTotal {
    fn zero() -> Self {
        Self { total_items: 0, total_price: 0.0 }
    }
}

/// Accumulates per-shop totals over every (item, shop, price) observation.
///
/// Every item present in `item_data` must have a quantity entry. Shops are
/// keyed in a `BTreeMap`, so the result iterates in shop-id order no matter
/// what order the observations arrived in.
pub fn aggregate(
    item_data: &ItemData,
    quantities: &BTreeMap<ItemKey, u32>,
) -> Result<BTreeMap<ShopId, ShopTotal>, BasketError> {
    let mut shop_totals: BTreeMap<ShopId, ShopTotal> = BTreeMap::new();

    for (item, shop_prices) in item_data {
        let qty = *quantities
            .get(item)
            .ok_or_else(|| BasketError::MissingQuantity(item.clone()))?;

        for (shop, price) in shop_prices {
            let totals = shop_totals.entry(shop.clone()).or_insert_with(ShopTotal::zero);
            totals.total_items += 1;
            totals.total_price += f64::from(qty) * price;
        }
    }

    Ok(shop_totals)
}

/// Keeps only shops stocking the full list and ranks them by total price.
///
/// Ties on price keep shop-id order (stable sort over the map's ordered
/// iteration). An empty result means no shop stocks everything; that is a
/// legitimate outcome, not an error.
pub fn select_cheapest(
    shop_totals: &BTreeMap<ShopId, ShopTotal>,
    required_item_count: u32,
) -> Vec<(ShopId, ShopTotal)> {
    let mut ranked: Vec<(ShopId, ShopTotal)> = shop_totals
        .iter()
        .filter(|(_, totals)| totals.total_items == required_item_count)
        .map(|(shop, totals)| (shop.clone(), totals.clone()))
        .collect();

    ranked.sort_by(|a, b| a.1.total_price.total_cmp(&b.1.total_price));
    ranked
}
