//! Data models for the Skroutz price payloads.

use serde::{Deserialize, Serialize};

/// Marketplace shipping details. Present only for offers with a
/// guaranteed direct-purchase path through Skroutz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    /// Template identifier for the shipping widget.
    pub template_name: Option<String>,
}

/// One shop's offer for a product, as returned by the bulk price
/// endpoint.
///
/// The upstream payload carries far more fields than we care about; this
/// is the recognized set, everything else is dropped during
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPrice {
    /// Net unit price, before payment-method surcharges.
    pub net_price: f64,
    /// Final price including surcharges.
    #[serde(default)]
    pub final_price: Option<f64>,
    /// Numeric shop identifier.
    pub shop_id: u64,
    /// Shipping cost, when the shop publishes one.
    #[serde(default)]
    pub shipping_cost: Option<f64>,
    /// Shop does not accept credit cards.
    #[serde(default)]
    pub no_credit_card: bool,
    /// Present iff the offer can be bought directly through Skroutz.
    #[serde(default)]
    pub shipping_info: Option<ShippingInfo>,
    /// Outbound link to the shop's product page.
    #[serde(default)]
    pub link: Option<String>,
}

impl ProductPrice {
    /// Whether this offer has a guaranteed purchase path through the
    /// marketplace.
    pub fn is_direct_purchase(&self) -> bool {
        self.shipping_info.is_some()
    }
}
