//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use bazaar_core::Price;
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as rupees, e.g. `₹1,299.00`.
///
/// Usage in templates: `{{ product.selling_rate|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let text = value.to_string();
    Ok(text
        .parse::<Decimal>()
        .map_or(text, |amount| Price::new(amount).display()))
}

/// Margin shown on product pages; undefined margins render as a dash.
#[must_use]
pub fn margin_label(margin: Option<Decimal>) -> String {
    margin.map_or_else(|| "\u{2014}".to_string(), |m| format!("{}%", m.round_dp(1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_margin_label() {
        assert_eq!(margin_label(Some(dec!(50))), "50%");
        assert_eq!(margin_label(Some(dec!(33.333))), "33.3%");
        assert_eq!(margin_label(None), "\u{2014}");
    }
}
