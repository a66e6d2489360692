//! Localized price strings.
//!
//! Catalog spreadsheets export prices in Brazilian notation: `.` groups
//! thousands and `,` separates decimals (`"1.234,56"`), often with a currency
//! prefix (`"R$ 1.234,56"`).

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parse a localized price string into a [`Decimal`].
///
/// Every character other than ASCII digits and `,` is discarded first, so
/// currency symbols, spaces, thousands separators and signs never reach the
/// number. The first `,` is the decimal separator; anything from a second `,`
/// onward is ignored. Empty or unparseable input yields zero, never an error.
///
/// ```
/// use pedido::core::parse_price;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_price("1.234,56"), dec!(1234.56));
/// assert_eq!(parse_price("R$ 120,00"), dec!(120));
/// assert_eq!(parse_price("abc"), dec!(0));
/// ```
pub fn parse_price(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    let mut parts = cleaned.split(',');
    let integer = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");

    if integer.is_empty() && fraction.is_empty() {
        return Decimal::ZERO;
    }

    let integer = if integer.is_empty() { "0" } else { integer };
    let literal = if fraction.is_empty() {
        integer.to_string()
    } else {
        format!("{integer}.{fraction}")
    };

    // Overlong inputs overflow Decimal's 28 significant digits.
    Decimal::from_str(&literal).unwrap_or(Decimal::ZERO)
}

/// Format an amount for display as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// Rounds half away from zero to two places. Display only; never feed the
/// result back into arithmetic.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{fraction}")
}
