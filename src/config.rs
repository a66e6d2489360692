//! Loading [`PricingConfig`] from TOML and the environment.
//!
//! ## Load order (later overrides earlier)
//! 1. Defaults
//! 2. Config file, when a path is given and the file exists
//! 3. Environment variables:
//!    `PEDIDO_EXCISE_RATE`, `PEDIDO_END_CONSUMER_SURCHARGE`, `PEDIDO_DEFAULT_TIER`
//!
//! ```toml
//! excise_rate_percent = "3.25"
//! end_consumer_surcharge_percent = "5"
//! default_tier = "icms17"
//! ```

use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::core::{PedidoError, PricingConfig, TaxTier};

pub const ENV_EXCISE_RATE: &str = "PEDIDO_EXCISE_RATE";
pub const ENV_END_CONSUMER_SURCHARGE: &str = "PEDIDO_END_CONSUMER_SURCHARGE";
pub const ENV_DEFAULT_TIER: &str = "PEDIDO_DEFAULT_TIER";

impl PricingConfig {
    /// Load from an optional TOML file, apply environment overrides and
    /// validate.
    pub fn load(path: Option<&Path>) -> Result<Self, PedidoError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "loading pricing config");
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml(&contents)?
            }
            Some(path) => {
                debug!(path = %path.display(), "pricing config not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load, or fall back to defaults when anything fails.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load pricing config, using defaults");
            Self::default()
        })
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml(contents: &str) -> Result<Self, PedidoError> {
        toml::from_str(contents).map_err(|e| PedidoError::Config(e.to_string()))
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, PedidoError> {
        toml::to_string_pretty(self).map_err(|e| PedidoError::Config(e.to_string()))
    }

    /// Apply overrides looked up by variable name. Unparseable values are
    /// logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_EXCISE_RATE) {
            match Decimal::from_str(raw.trim()) {
                Ok(rate) => {
                    debug!(%rate, "overriding excise rate from environment");
                    self.excise_rate_percent = rate;
                }
                Err(e) => warn!(value = %raw, error = %e, "ignoring {ENV_EXCISE_RATE}"),
            }
        }

        if let Some(raw) = lookup(ENV_END_CONSUMER_SURCHARGE) {
            match Decimal::from_str(raw.trim()) {
                Ok(rate) => {
                    debug!(%rate, "overriding end-consumer surcharge from environment");
                    self.end_consumer_surcharge_percent = rate;
                }
                Err(e) => warn!(value = %raw, error = %e, "ignoring {ENV_END_CONSUMER_SURCHARGE}"),
            }
        }

        if let Some(raw) = lookup(ENV_DEFAULT_TIER) {
            match raw.parse::<TaxTier>() {
                Ok(tier) => {
                    debug!(%tier, "overriding default tier from environment");
                    self.default_tier = tier;
                }
                Err(e) => warn!(value = %raw, error = %e, "ignoring {ENV_DEFAULT_TIER}"),
            }
        }
    }
}
