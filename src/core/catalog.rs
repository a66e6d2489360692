//! Catalog records as loaded from the distributor's spreadsheets.
//!
//! Each catalog has its own record shape; [`CatalogItem`] wraps them so the
//! cart can resolve ids, descriptions and prices with an exhaustive match.

use serde::{Deserialize, Serialize};

use super::regions::TaxTier;
use super::types::ItemCategory;

/// The three tier-keyed price strings of a tier-priced record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPrices {
    pub icms17: String,
    pub icms12: String,
    pub icms7: String,
}

impl TierPrices {
    pub fn new(
        icms17: impl Into<String>,
        icms12: impl Into<String>,
        icms7: impl Into<String>,
    ) -> Self {
        Self {
            icms17: icms17.into(),
            icms12: icms12.into(),
            icms7: icms7.into(),
        }
    }

    /// Price string for `tier`.
    pub fn for_tier(&self, tier: TaxTier) -> &str {
        match tier {
            TaxTier::Icms17 => &self.icms17,
            TaxTier::Icms12 => &self.icms12,
            TaxTier::Icms7 => &self.icms7,
        }
    }
}

/// Where a record's unit price comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource<'a> {
    Tiered(&'a TierPrices),
    Fixed(&'a str),
}

impl<'a> PriceSource<'a> {
    /// Raw price string applicable under `tier`.
    pub fn resolve(&self, tier: TaxTier) -> &'a str {
        match self {
            Self::Tiered(prices) => prices.for_tier(tier),
            Self::Fixed(price) => price,
        }
    }
}

/// Slack adjuster (catraca) catalog row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardPart {
    pub vehicle: String,
    pub internal_code: String,
    pub vendor_code: String,
    pub model: String,
    /// Application text; preferred display description.
    pub application: String,
    pub side: String,
    pub prices: TierPrices,
}

/// One item extracted from a vehicle's brake kit row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrakeKitComponent {
    pub vehicle: String,
    /// Item type label; stands in for the id when the code is blank.
    pub item_type: String,
    pub internal_code: String,
    pub vendor_code: String,
    pub description: String,
    pub prices: TierPrices,
    /// Whether the kit row actually lists this item.
    pub found: bool,
}

/// Third-axle kit part with a region-independent price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdAxleKitPart {
    pub vehicle: String,
    pub part_type: String,
    pub internal_code: String,
    pub vendor_code: String,
    pub description: String,
    /// Suggested quantity for a complete kit.
    pub default_quantity: u32,
    pub price: String,
    pub configuration: String,
}

/// Driveshaft (cardan) part. Carries one price string but is ordered as a
/// standard part, so it still takes part in the tier lock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveshaftPart {
    pub model: String,
    pub vehicle: String,
    pub internal_code: String,
    pub tube_size: String,
    pub pieces: String,
    pub cross: String,
    pub cross_size: String,
    pub notes: String,
    pub price: String,
}

/// Any orderable catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogItem {
    StandardPart(StandardPart),
    BrakeKitComponent(BrakeKitComponent),
    ThirdAxleKitPart(ThirdAxleKitPart),
    DriveshaftPart(DriveshaftPart),
}

impl CatalogItem {
    /// Cart category this record is ordered under.
    pub fn category(&self) -> ItemCategory {
        match self {
            Self::StandardPart(_) | Self::DriveshaftPart(_) => ItemCategory::StandardPart,
            Self::BrakeKitComponent(_) => ItemCategory::BrakeKitComponent,
            Self::ThirdAxleKitPart(_) => ItemCategory::ThirdAxleKitPart,
        }
    }

    pub fn internal_code(&self) -> &str {
        match self {
            Self::StandardPart(p) => &p.internal_code,
            Self::BrakeKitComponent(k) => &k.internal_code,
            Self::ThirdAxleKitPart(t) => &t.internal_code,
            Self::DriveshaftPart(d) => &d.internal_code,
        }
    }

    /// Vendor code; driveshaft rows have none.
    pub fn vendor_code(&self) -> &str {
        match self {
            Self::StandardPart(p) => &p.vendor_code,
            Self::BrakeKitComponent(k) => &k.vendor_code,
            Self::ThirdAxleKitPart(t) => &t.vendor_code,
            Self::DriveshaftPart(_) => "",
        }
    }

    /// Cart line id: the internal code, or the record's type label when the
    /// code is blank.
    pub fn line_id(&self) -> String {
        let code = self.internal_code().trim();
        if !code.is_empty() {
            return code.to_string();
        }
        let fallback = match self {
            Self::StandardPart(p) => &p.model,
            Self::BrakeKitComponent(k) => &k.item_type,
            Self::ThirdAxleKitPart(t) => &t.part_type,
            Self::DriveshaftPart(d) => &d.model,
        };
        fallback.trim().to_string()
    }

    /// Most specific non-empty display text of the record.
    pub fn display_description(&self) -> String {
        let candidates: [&str; 3] = match self {
            Self::StandardPart(p) => [p.application.as_str(), p.model.as_str(), ""],
            Self::BrakeKitComponent(k) => [k.description.as_str(), k.item_type.as_str(), ""],
            Self::ThirdAxleKitPart(t) => [
                t.description.as_str(),
                t.configuration.as_str(),
                t.part_type.as_str(),
            ],
            Self::DriveshaftPart(d) => [d.pieces.as_str(), d.model.as_str(), ""],
        };
        candidates
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    pub fn price_source(&self) -> PriceSource<'_> {
        match self {
            Self::StandardPart(p) => PriceSource::Tiered(&p.prices),
            Self::BrakeKitComponent(k) => PriceSource::Tiered(&k.prices),
            Self::ThirdAxleKitPart(t) => PriceSource::Fixed(&t.price),
            Self::DriveshaftPart(d) => PriceSource::Fixed(&d.price),
        }
    }
}

impl From<StandardPart> for CatalogItem {
    fn from(part: StandardPart) -> Self {
        Self::StandardPart(part)
    }
}

impl From<BrakeKitComponent> for CatalogItem {
    fn from(component: BrakeKitComponent) -> Self {
        Self::BrakeKitComponent(component)
    }
}

impl From<ThirdAxleKitPart> for CatalogItem {
    fn from(part: ThirdAxleKitPart) -> Self {
        Self::ThirdAxleKitPart(part)
    }
}

impl From<DriveshaftPart> for CatalogItem {
    fn from(part: DriveshaftPart) -> Self {
        Self::DriveshaftPart(part)
    }
}
