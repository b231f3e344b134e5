//! Skroutz-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{PriceSource, SkroutzClient};
pub use models::{ProductPrice, ShippingInfo};
