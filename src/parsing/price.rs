use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::error::PriceError;

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([£$])\s*(\d+\.\d{2})\s*(\d+\.\d{2})?").expect("valid price regex")
});

const EXPECTED_CURRENCY: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceInfo {
    pub currency: char,
    pub usd_price: Decimal,
    /// Discounted price divided by full price, two decimal places. Zero when
    /// the item is not on sale.
    pub sale_discount: Decimal,
}

/// Parses `"$ 430.91 129.27"` style price text.
///
/// A currency other than USD is only logged; the numeric value is used as-is.
///
/// # Errors
///
/// Returns [`PriceError::NoMatch`] when the text holds no price, and
/// [`PriceError::ZeroPrice`] when a discounted price accompanies a zero price.
pub fn parse_price(text: &str) -> Result<PriceInfo, PriceError> {
    let caps = PRICE_RE.captures(text).ok_or_else(|| PriceError::NoMatch {
        text: text.to_string(),
    })?;

    let currency = caps[1].chars().next().unwrap_or(EXPECTED_CURRENCY);
    if currency != EXPECTED_CURRENCY {
        warn!("Currency wasn't changed to USD (found {currency})");
    }

    // The regex only admits digits and one dot, both always parse
    let usd_price: Decimal = caps[2].parse().map_err(|_| PriceError::NoMatch {
        text: text.to_string(),
    })?;

    let sale_discount = match caps.get(3) {
        Some(discounted) => {
            let discounted: Decimal =
                discounted.as_str().parse().map_err(|_| PriceError::NoMatch {
                    text: text.to_string(),
                })?;
            let ratio = discounted
                .checked_div(usd_price)
                .ok_or(PriceError::ZeroPrice)?
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            if ratio > Decimal::ONE {
                warn!("Discounted price {discounted} exceeds full price {usd_price}, clamping");
                Decimal::ONE
            } else {
                ratio
            }
        }
        None => Decimal::ZERO,
    };

    Ok(PriceInfo {
        currency,
        usd_price,
        sale_discount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_price_with_discount() {
        let info = parse_price("$ 430.91 129.27").unwrap();
        assert_eq!(info.usd_price, Decimal::new(43091, 2));
        assert_eq!(info.sale_discount, Decimal::new(30, 2));
        assert_eq!(info.currency, '$');
    }

    #[test]
    fn missing_discount_yields_zero() {
        let info = parse_price("$255.00").unwrap();
        assert_eq!(info.usd_price, Decimal::new(25500, 2));
        assert_eq!(info.sale_discount, Decimal::ZERO);
    }

    #[test]
    fn other_currency_still_parses() {
        let info = parse_price("£ 255.00 76.50").unwrap();
        assert_eq!(info.currency, '£');
        assert_eq!(info.usd_price, Decimal::new(25500, 2));
        assert_eq!(info.sale_discount, Decimal::new(30, 2));
    }

    #[test]
    fn surrounding_text_is_ignored() {
        let info = parse_price("Price:\n  $ 99.00\n  ").unwrap();
        assert_eq!(info.usd_price, Decimal::new(9900, 2));
    }

    #[test]
    fn text_without_price_fails() {
        assert_eq!(
            parse_price("Sold out"),
            Err(PriceError::NoMatch {
                text: "Sold out".to_string()
            })
        );
        assert!(parse_price("$ 12").is_err());
    }

    #[test]
    fn zero_price_with_discount_fails() {
        assert_eq!(parse_price("$ 0.00 10.00"), Err(PriceError::ZeroPrice));
    }

    #[test]
    fn discount_stays_within_unit_interval() {
        for text in ["$ 100.00 0.00", "$ 100.00 99.99", "$ 10.00 25.00", "$ 3.00 1.00"] {
            let info = parse_price(text).unwrap();
            assert!(
                info.sale_discount >= Decimal::ZERO && info.sale_discount <= Decimal::ONE,
                "{text} gave {}",
                info.sale_discount
            );
        }
    }

    #[test]
    fn discount_rounds_half_away_from_zero() {
        let info = parse_price("$ 8.00 1.00").unwrap();
        assert_eq!(info.sale_discount, Decimal::new(13, 2));

        let info = parse_price("$ 8.00 3.00").unwrap();
        assert_eq!(info.sale_discount, Decimal::new(38, 2));
    }
}
