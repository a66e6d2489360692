use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::PedidoError;
use super::regions::TaxTier;

/// Pricing constants applied by the totals calculator and tier resolver.
///
/// ```toml
/// excise_rate_percent = "3.25"
/// end_consumer_surcharge_percent = "5"
/// default_tier = "icms17"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Federal excise (IPI) rate applied to every subtotal.
    pub excise_rate_percent: Decimal,
    /// Extra charge on sales to end consumers.
    pub end_consumer_surcharge_percent: Decimal,
    /// Tier used when no region is selected.
    pub default_tier: TaxTier,
}

impl PricingConfig {
    pub const DEFAULT_EXCISE_RATE_PERCENT: Decimal = dec!(3.25);
    pub const DEFAULT_END_CONSUMER_SURCHARGE_PERCENT: Decimal = dec!(5);

    /// Reject rates outside `0..=100`.
    pub fn validate(&self) -> Result<(), PedidoError> {
        let in_range = |rate: Decimal| rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED;
        if !in_range(self.excise_rate_percent) {
            return Err(PedidoError::Config(format!(
                "excise rate {} must be between 0 and 100",
                self.excise_rate_percent
            )));
        }
        if !in_range(self.end_consumer_surcharge_percent) {
            return Err(PedidoError::Config(format!(
                "end-consumer surcharge {} must be between 0 and 100",
                self.end_consumer_surcharge_percent
            )));
        }
        Ok(())
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            excise_rate_percent: Self::DEFAULT_EXCISE_RATE_PERCENT,
            end_consumer_surcharge_percent: Self::DEFAULT_END_CONSUMER_SURCHARGE_PERCENT,
            default_tier: TaxTier::Icms17,
        }
    }
}
