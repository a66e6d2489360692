//! # pedido
//!
//! Cart pricing and tax-tier consistency engine for a truck-parts
//! distributor's quote/order front end: slack adjusters, brake kits,
//! third-axle kits and driveshaft parts.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Tier-priced items take their unit price from the ICMS tier of the
//! destination region at the moment they are added, and a cart never mixes
//! tiers: adding an item at another tier raises a conflict the user must
//! resolve by replacing the cart or cancelling.
//!
//! ## Quick Start
//!
//! ```rust
//! use pedido::core::*;
//! use rust_decimal_macros::dec;
//!
//! let slack_adjuster: CatalogItem = StandardPart {
//!     internal_code: "CAT-100".into(),
//!     application: "Catraca automática traseira".into(),
//!     prices: TierPrices::new("120,00", "112,00", "104,00"),
//!     ..Default::default()
//! }
//! .into();
//! let spring: CatalogItem = ThirdAxleKitPart {
//!     internal_code: "3E-200".into(),
//!     description: "Feixe de molas".into(),
//!     price: "50,00".into(),
//!     ..Default::default()
//! }
//! .into();
//!
//! let mut session = OrderSession::open(MemoryStorage::new(), PricingConfig::default());
//! let tier = session.resolve_tier("RS");
//! session.add_catalog_item(&slack_adjuster, 2, tier);
//! session.add_catalog_item(&spring, 1, tier);
//!
//! let totals = session.totals();
//! assert_eq!(totals.subtotal, dec!(290));
//! assert_eq!(totals.tax_amount, dec!(9.425));
//! assert_eq!(totals.total, dec!(299.425));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Catalog records, order session, totals, snapshot, in-memory storage |
//! | `store` | Directory-backed JSON storage |
//! | `config` | TOML + environment loading of [`core::PricingConfig`] |
//! | `export` | CSV rendering of order documents |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "store")]
pub mod store;

#[cfg(feature = "config")]
pub mod config;

#[cfg(feature = "export")]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
