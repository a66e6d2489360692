use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Cart, CartLine, CustomerMetadata, Totals};

/// Label printed when the cart has no active tax tier.
pub const STANDARD_TIER_LABEL: &str = "standard";

/// Client name used in the order id when the customer name is blank.
const DEFAULT_CLIENT_NAME: &str = "Cliente";

/// One printed order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub internal_code: String,
    pub vendor_code: String,
    pub description: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            internal_code: line.internal_code.clone(),
            vendor_code: line.vendor_code.clone(),
            description: line.description.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total: line.line_total(),
        }
    }
}

/// Frozen order, ready for a print or render collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDocument {
    /// `"{client} {DDMMYYYYHHMM}"`.
    pub order_id: String,
    pub issued_at: NaiveDateTime,
    pub lines: Vec<OrderLine>,
    pub customer: CustomerMetadata,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    /// Excise rate the tax amount was computed with.
    pub excise_rate_percent: Decimal,
    pub end_consumer_surcharge: bool,
    /// Active tier label (`"17%"`) or [`STANDARD_TIER_LABEL`].
    pub tax_tier_label: String,
}

/// Freeze `cart`, `customer` and `totals` into an [`OrderDocument`].
///
/// Performs no arithmetic beyond copying line totals.
pub fn export_snapshot(
    cart: &Cart,
    customer: &CustomerMetadata,
    totals: &Totals,
    excise_rate_percent: Decimal,
    issued_at: NaiveDateTime,
) -> OrderDocument {
    OrderDocument {
        order_id: order_id(&customer.name, issued_at),
        issued_at,
        lines: cart.lines.iter().map(OrderLine::from).collect(),
        customer: customer.clone(),
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total: totals.total,
        excise_rate_percent,
        end_consumer_surcharge: totals.end_consumer_surcharge,
        tax_tier_label: cart
            .active_tier
            .map_or_else(|| STANDARD_TIER_LABEL.to_string(), |tier| tier.label()),
    }
}

/// Order id derived from the customer name and issue time.
///
/// The name keeps only ASCII letters, digits and spaces.
pub fn order_id(customer_name: &str, issued_at: NaiveDateTime) -> String {
    let cleaned: String = customer_name
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let client = if cleaned.trim().is_empty() {
        DEFAULT_CLIENT_NAME
    } else {
        cleaned.trim()
    };
    format!("{client} {}", issued_at.format("%d%m%Y%H%M"))
}
