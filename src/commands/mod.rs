//! CLI command implementations.

pub mod basket;
pub mod prices;

pub use basket::BasketCommand;
pub use prices::PricesCommand;
