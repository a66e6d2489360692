use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::regions::TaxTier;

/// Kind of orderable line. Decides whether the line takes part in the
/// cart's tax-tier lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Catalog parts priced per tax tier (slack adjusters, driveshaft parts).
    StandardPart,
    /// Brake kit items, priced per tax tier.
    BrakeKitComponent,
    /// Third-axle kit parts with one fixed price regardless of region.
    ThirdAxleKitPart,
}

impl ItemCategory {
    /// Whether lines of this category must share the cart's active tier.
    pub fn is_tier_dependent(&self) -> bool {
        !matches!(self, Self::ThirdAxleKitPart)
    }
}

/// Tier that was active when a line was first added, or `Fixed` for
/// tier-independent lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TaxOrigin {
    Tier(TaxTier),
    Fixed,
}

impl TaxOrigin {
    const FIXED: &'static str = "fixed";

    /// The originating tier, if the line is tier-dependent.
    pub fn tier(&self) -> Option<TaxTier> {
        match self {
            Self::Tier(tier) => Some(*tier),
            Self::Fixed => None,
        }
    }
}

impl fmt::Display for TaxOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tier(tier) => f.write_str(tier.code()),
            Self::Fixed => f.write_str(Self::FIXED),
        }
    }
}

impl From<TaxOrigin> for String {
    fn from(origin: TaxOrigin) -> Self {
        origin.to_string()
    }
}

impl TryFrom<String> for TaxOrigin {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == Self::FIXED {
            return Ok(Self::Fixed);
        }
        TaxTier::from_code(&value)
            .map(Self::Tier)
            .ok_or_else(|| format!("unknown tax origin '{value}'"))
    }
}

/// One orderable line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Deduplication key: internal code, or the type label when there is none.
    pub id: String,
    /// Distributor's internal code.
    pub internal_code: String,
    /// Manufacturer/vendor code.
    pub vendor_code: String,
    /// Display text resolved at insertion time.
    pub description: String,
    /// Price per unit, fixed at insertion time.
    pub unit_price: Decimal,
    /// Always at least 1.
    pub quantity: u32,
    pub item_category: ItemCategory,
    pub tax_origin: TaxOrigin,
}

impl CartLine {
    /// `unit_price × quantity`, saturating at [`Decimal::MAX`].
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    /// `unit_price × quantity`, or `None` when it exceeds [`Decimal`]'s range.
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether this line takes part in the tax-tier lock.
    pub fn is_tier_dependent(&self) -> bool {
        self.item_category.is_tier_dependent()
    }
}

/// The session's order cart.
///
/// All tier-dependent lines of a non-empty cart share `active_tier`; fixed
/// price lines never set or block it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order, unique by `id`.
    pub lines: Vec<CartLine>,
    /// `None` when empty or holding only tier-independent lines.
    pub active_tier: Option<TaxTier>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub(crate) fn line_mut(&mut self, id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.line(id).is_some()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether any line participates in the tier lock.
    pub fn has_tier_dependent_lines(&self) -> bool {
        self.lines.iter().any(CartLine::is_tier_dependent)
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        self.active_tier = None;
    }
}

/// Order, shipping and billing fields typed in by the user.
///
/// Free-form; nothing is validated beyond presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomerMetadata {
    pub name: String,
    /// CNPJ / CPF.
    pub tax_id: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    /// Two-letter UF of the customer.
    pub state: String,
    pub representative: String,
    /// Customer's own purchase order number.
    pub order_reference: String,
    pub payment_terms: String,
    pub carrier: String,
    /// CIF / FOB.
    pub freight_terms: String,
    pub notes: String,
}

impl CustomerMetadata {
    /// True when every field is empty.
    pub fn is_blank(&self) -> bool {
        CustomerField::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn get(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::TaxId => &self.tax_id,
            CustomerField::Contact => &self.contact,
            CustomerField::Phone => &self.phone,
            CustomerField::Email => &self.email,
            CustomerField::City => &self.city,
            CustomerField::State => &self.state,
            CustomerField::Representative => &self.representative,
            CustomerField::OrderReference => &self.order_reference,
            CustomerField::PaymentTerms => &self.payment_terms,
            CustomerField::Carrier => &self.carrier,
            CustomerField::FreightTerms => &self.freight_terms,
            CustomerField::Notes => &self.notes,
        }
    }

    pub fn set(&mut self, field: CustomerField, value: impl Into<String>) {
        let slot = match field {
            CustomerField::Name => &mut self.name,
            CustomerField::TaxId => &mut self.tax_id,
            CustomerField::Contact => &mut self.contact,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Email => &mut self.email,
            CustomerField::City => &mut self.city,
            CustomerField::State => &mut self.state,
            CustomerField::Representative => &mut self.representative,
            CustomerField::OrderReference => &mut self.order_reference,
            CustomerField::PaymentTerms => &mut self.payment_terms,
            CustomerField::Carrier => &mut self.carrier,
            CustomerField::FreightTerms => &mut self.freight_terms,
            CustomerField::Notes => &mut self.notes,
        };
        *slot = value.into();
    }
}

/// Addressable field of [`CustomerMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Name,
    TaxId,
    Contact,
    Phone,
    Email,
    City,
    State,
    Representative,
    OrderReference,
    PaymentTerms,
    Carrier,
    FreightTerms,
    Notes,
}

impl CustomerField {
    pub const ALL: [CustomerField; 13] = [
        Self::Name,
        Self::TaxId,
        Self::Contact,
        Self::Phone,
        Self::Email,
        Self::City,
        Self::State,
        Self::Representative,
        Self::OrderReference,
        Self::PaymentTerms,
        Self::Carrier,
        Self::FreightTerms,
        Self::Notes,
    ];
}

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Σ unit price × quantity.
    pub subtotal: Decimal,
    /// Federal excise (IPI) on the subtotal.
    pub tax_amount: Decimal,
    /// `subtotal + tax_amount`, times the end-consumer factor when applied.
    pub total: Decimal,
    /// Whether the end-consumer surcharge is included in `total`.
    pub end_consumer_surcharge: bool,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        subtotal: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total: Decimal::ZERO,
        end_consumer_surcharge: false,
    };
}
