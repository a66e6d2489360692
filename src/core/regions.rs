//! Regional ICMS tax tiers.
//!
//! Every Brazilian federative unit (26 states plus the Federal District) maps
//! to one of three interstate ICMS tiers. The tier decides which of a
//! tier-priced catalog item's three prices applies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three regional ICMS tiers.
///
/// Serialized with the identifiers used by the persisted cart
/// (`"icms17"`, `"icms12"`, `"icms7"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TaxTier {
    /// 17%, the default and highest tier.
    #[default]
    #[serde(rename = "icms17")]
    Icms17,
    /// 12%.
    #[serde(rename = "icms12")]
    Icms12,
    /// 7%.
    #[serde(rename = "icms7")]
    Icms7,
}

impl TaxTier {
    /// All tiers, highest first.
    pub const ALL: [TaxTier; 3] = [TaxTier::Icms17, TaxTier::Icms12, TaxTier::Icms7];

    /// Persisted identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Icms17 => "icms17",
            Self::Icms12 => "icms12",
            Self::Icms7 => "icms7",
        }
    }

    /// Parse from the persisted identifier.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "icms17" => Some(Self::Icms17),
            "icms12" => Some(Self::Icms12),
            "icms7" => Some(Self::Icms7),
            _ => None,
        }
    }

    /// Rate as a whole percentage.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Icms17 => 17,
            Self::Icms12 => 12,
            Self::Icms7 => 7,
        }
    }

    /// Display label, e.g. `"17%"`.
    pub fn label(&self) -> String {
        format!("{}%", self.percent())
    }
}

impl fmt::Display for TaxTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TaxTier {
    type Err = String;

    /// Accepts the persisted identifier or a bare percentage (`"12"`, `"12%"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(tier) = Self::from_code(&s.to_ascii_lowercase()) {
            return Ok(tier);
        }
        match s.trim_end_matches('%') {
            "17" => Ok(Self::Icms17),
            "12" => Ok(Self::Icms12),
            "7" => Ok(Self::Icms7),
            _ => Err(format!("unknown tax tier '{s}'")),
        }
    }
}

/// A federative unit and its ICMS tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Two-letter UF code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Tier applied to orders shipped there.
    pub tier: TaxTier,
}

/// Resolve the tax tier for a region code.
///
/// Empty or unknown codes fall back to [`TaxTier::Icms17`].
pub fn resolve_tax_tier(region_code: &str) -> TaxTier {
    resolve_tax_tier_with(region_code, TaxTier::Icms17)
}

/// Resolve the tax tier for a region code, using `default` for empty or
/// unknown codes.
pub fn resolve_tax_tier_with(region_code: &str, default: TaxTier) -> TaxTier {
    find_region(region_code).map_or(default, |r| r.tier)
}

/// Display name for a region code, if known.
pub fn region_name(region_code: &str) -> Option<&'static str> {
    find_region(region_code).map(|r| r.name)
}

/// The full region table, sorted by code.
pub fn regions() -> &'static [Region] {
    REGIONS
}

fn find_region(region_code: &str) -> Option<&'static Region> {
    let code = region_code.trim();
    if code.is_empty() {
        return None;
    }
    let code = code.to_ascii_uppercase();
    REGIONS
        .binary_search_by(|r| r.code.cmp(code.as_str()))
        .ok()
        .map(|i| &REGIONS[i])
}

const fn region(code: &'static str, name: &'static str, tier: TaxTier) -> Region {
    Region { code, name, tier }
}

/// Sorted by code for binary search.
static REGIONS: &[Region] = &[
    region("AC", "Acre", TaxTier::Icms7),
    region("AL", "Alagoas", TaxTier::Icms7),
    region("AM", "Amazonas", TaxTier::Icms7),
    region("AP", "Amapá", TaxTier::Icms7),
    region("BA", "Bahia", TaxTier::Icms7),
    region("CE", "Ceará", TaxTier::Icms7),
    region("DF", "Distrito Federal", TaxTier::Icms7),
    region("ES", "Espírito Santo", TaxTier::Icms7),
    region("GO", "Goiás", TaxTier::Icms7),
    region("MA", "Maranhão", TaxTier::Icms7),
    region("MG", "Minas Gerais", TaxTier::Icms12),
    region("MS", "Mato Grosso do Sul", TaxTier::Icms7),
    region("MT", "Mato Grosso", TaxTier::Icms7),
    region("PA", "Pará", TaxTier::Icms7),
    region("PB", "Paraíba", TaxTier::Icms7),
    region("PE", "Pernambuco", TaxTier::Icms7),
    region("PI", "Piauí", TaxTier::Icms7),
    region("PR", "Paraná", TaxTier::Icms12),
    region("RJ", "Rio de Janeiro", TaxTier::Icms12),
    region("RN", "Rio Grande do Norte", TaxTier::Icms7),
    region("RO", "Rondônia", TaxTier::Icms7),
    region("RR", "Roraima", TaxTier::Icms7),
    region("RS", "Rio Grande do Sul", TaxTier::Icms17),
    region("SC", "Santa Catarina", TaxTier::Icms12),
    region("SE", "Sergipe", TaxTier::Icms7),
    region("SP", "São Paulo", TaxTier::Icms12),
    region("TO", "Tocantins", TaxTier::Icms7),
];
