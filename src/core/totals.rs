use rust_decimal::Decimal;
use tracing::warn;

use super::catalog::CatalogItem;
use super::config::PricingConfig;
use super::price::parse_price;
use super::regions::TaxTier;
use super::types::{CartLine, Totals};

/// Compute totals over cart lines.
///
/// `subtotal = Σ unit_price × quantity`, `tax_amount = subtotal ×
/// excise_rate_percent / 100`, `total = subtotal + tax_amount`. With the
/// end-consumer surcharge, `total` is scaled by `1 + surcharge / 100`, so the
/// surcharge applies to the taxed amount. Nothing is rounded. Amounts beyond
/// [`Decimal`]'s range saturate at [`Decimal::MAX`].
///
/// ```
/// use pedido::core::*;
/// use rust_decimal_macros::dec;
///
/// let totals = compute_totals(&[], &PricingConfig::default(), false);
/// assert_eq!(totals.total, dec!(0));
/// ```
pub fn compute_totals(
    lines: &[CartLine],
    config: &PricingConfig,
    apply_end_consumer_surcharge: bool,
) -> Totals {
    let subtotal = saturating_sum(lines.iter().map(CartLine::checked_line_total));
    totals_from_subtotal(subtotal, config, apply_end_consumer_surcharge)
}

/// Compute totals for a transient selection that has not been added to the
/// cart, pricing each record at `tier` (fixed-price records at their fixed
/// price). Zero quantities contribute nothing.
pub fn selection_totals(
    selection: &[(&CatalogItem, u32)],
    tier: TaxTier,
    config: &PricingConfig,
    apply_end_consumer_surcharge: bool,
) -> Totals {
    let subtotal = saturating_sum(selection.iter().map(|(item, quantity)| {
        parse_price(item.price_source().resolve(tier)).checked_mul(Decimal::from(*quantity))
    }));
    totals_from_subtotal(subtotal, config, apply_end_consumer_surcharge)
}

fn saturating_sum(amounts: impl Iterator<Item = Option<Decimal>>) -> Decimal {
    let mut sum = Some(Decimal::ZERO);
    for amount in amounts {
        sum = sum.zip(amount).and_then(|(sum, amount)| sum.checked_add(amount));
    }
    saturate(sum, "subtotal")
}

fn saturate(amount: Option<Decimal>, what: &str) -> Decimal {
    amount.unwrap_or_else(|| {
        warn!(what, "amount out of range, saturating");
        Decimal::MAX
    })
}

fn totals_from_subtotal(
    subtotal: Decimal,
    config: &PricingConfig,
    apply_end_consumer_surcharge: bool,
) -> Totals {
    let tax_amount = saturate(
        subtotal
            .checked_mul(config.excise_rate_percent)
            .and_then(|t| t.checked_div(Decimal::ONE_HUNDRED)),
        "tax amount",
    );
    let mut total = saturate(subtotal.checked_add(tax_amount), "total");
    if apply_end_consumer_surcharge {
        let factor = Decimal::ONE + config.end_consumer_surcharge_percent / Decimal::ONE_HUNDRED;
        total = saturate(total.checked_mul(factor), "total");
    }

    Totals {
        subtotal,
        tax_amount,
        total,
        end_consumer_surcharge: apply_end_consumer_surcharge,
    }
}
