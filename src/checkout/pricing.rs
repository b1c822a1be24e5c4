//! Subtotal, tax and total for a cart.

use crate::config::StorefrontConfig;
use crate::model::CartState;
use serde::Serialize;

/// Tax charged on the cart subtotal. A rate of `0.0` means no tax.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaxPolicy {
    rate: f64,
}

impl TaxPolicy {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.max(0.0),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(config.tax_rate)
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn is_enabled(&self) -> bool {
        self.rate > 0.0
    }

    pub fn summarize(&self, cart: &CartState) -> PriceSummary {
        let subtotal = cart.total_price();
        let tax = subtotal * self.rate;
        PriceSummary {
            subtotal,
            tax,
            total: subtotal + tax,
            total_items: cart.total_items(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSummary {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub total_items: u64,
}
