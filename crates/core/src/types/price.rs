//! Type-safe price representation using decimal arithmetic.
//!
//! Rates arrive from the backend as plain numbers; everything the UI shows
//! (profit, margin, report totals) is computed with [`Decimal`] and formatted
//! here.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An amount in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in rupees, not paise.
    pub amount: Decimal,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self { amount }
    }

    /// Format for display with Indian digit grouping, e.g. `₹1,23,456.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((&text, "00"));
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!("{sign}₹{}.{fraction}", group_indian(whole))
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Profit margin as a percentage of the purchase rate, rounded to 2 places.
///
/// Returns `None` when the purchase rate is zero (margin undefined) or the
/// result does not fit in a [`Decimal`].
#[must_use]
pub fn margin_percent(purchase_rate: Decimal, selling_rate: Decimal) -> Option<Decimal> {
    if purchase_rate.is_zero() {
        return None;
    }
    let profit = selling_rate.checked_sub(purchase_rate)?;
    let ratio = profit.checked_div(purchase_rate)?;
    Some(ratio.checked_mul(Decimal::ONE_HUNDRED)?.round_dp(2))
}

/// 1234567 -> 12,34,567 (last three digits, then groups of two)
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.push(',');
    out.push_str(tail);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_display_indian_grouping() {
        assert_eq!(Price::new(dec!(1234567.5)).display(), "₹12,34,567.50");
        assert_eq!(Price::new(dec!(999)).display(), "₹999.00");
        assert_eq!(Price::new(dec!(1000)).display(), "₹1,000.00");
        assert_eq!(Price::new(dec!(0.005)).display(), "₹0.01");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::new(dec!(-250)).display(), "-₹250.00");
    }

    #[test]
    fn test_margin_percent() {
        assert_eq!(margin_percent(dec!(100), dec!(150)), Some(dec!(50)));
        assert_eq!(margin_percent(dec!(300), dec!(400)), Some(dec!(33.33)));
        assert_eq!(margin_percent(Decimal::ZERO, dec!(10)), None);
    }

    #[test]
    fn test_margin_percent_overflow() {
        assert_eq!(margin_percent(dec!(0.0000000001), Decimal::MAX), None);
        assert_eq!(margin_percent(Decimal::MAX, Decimal::MIN), None);
    }
}
