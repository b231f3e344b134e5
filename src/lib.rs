//! skroutz-basket - cheapest-shop finder for a Skroutz shopping list
//!
//! Scrapes per-shop prices for every item on a shopping list and ranks
//! the shops that can supply the whole list by total cost.

pub mod basket;
pub mod commands;
pub mod config;
pub mod format;
pub mod skroutz;

pub use basket::{aggregate, select_cheapest, ItemData, ShopPriceMap, ShopTotal};
pub use config::{Config, ShoppingList};
pub use skroutz::{PriceSource, SkroutzClient};
