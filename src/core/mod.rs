//! Core cart pricing types, the order session and its persistence port.
//!
//! This module provides catalog records, the cart engine with its tax-tier
//! lock, the totals calculator and the order snapshot.

mod catalog;
mod config;
mod error;
mod price;
pub mod regions;
mod roles;
mod session;
mod snapshot;
mod storage;
mod totals;
mod types;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use price::*;
pub use regions::{Region, TaxTier, region_name, regions, resolve_tax_tier, resolve_tax_tier_with};
pub use roles::*;
pub use session::*;
pub use snapshot::*;
pub use storage::*;
pub use totals::*;
pub use types::*;
