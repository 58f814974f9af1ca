//! Client-side checks run before anything is submitted.
//!
//! Every check here is pure. A failure means the form is re-rendered with the
//! error inline and no request is made to the backend.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    BusinessHours, Email, EmailError, Product, ProductInput, SaleRequest, Settings, Weekday,
    normalize_primary,
};

/// Maximum GST percentage accepted on a product.
pub const MAX_GST_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// A failed client-side check.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{field} must be a whole number")]
    NotAWholeNumber { field: &'static str },

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("Selling rate must be greater than purchase rate")]
    SellingNotAbovePurchase,

    #[error("Only {available} in stock, cannot sell {requested}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("GST must be between 0 and 100")]
    GstOutOfRange,

    #[error("{day}: opening and closing times are required")]
    HoursMissing { day: &'static str },

    #[error("{day}: time must be in HH:MM format")]
    HoursInvalid { day: &'static str },

    #[error("{day}: closing time must be after opening time")]
    HoursInverted { day: &'static str },

    #[error("{field} must be a date in YYYY-MM-DD format")]
    InvalidDate { field: &'static str },

    #[error("Start date must not be after end date")]
    DateRangeInverted,

    #[error("Invalid email {email}: {source}")]
    InvalidEmail {
        email: String,
        #[source]
        source: EmailError,
    },
}

// =============================================================================
// Products
// =============================================================================

/// Product form as submitted, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: String,
    pub barcode: String,
    pub purchase_rate: String,
    pub selling_rate: String,
    pub quantity: String,
    pub gst: String,
    pub category: String,
    pub description: String,
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            purchase_rate: product.purchase_rate.normalize().to_string(),
            selling_rate: product.selling_rate.normalize().to_string(),
            quantity: product.quantity.to_string(),
            gst: product.gst.normalize().to_string(),
            category: product.category.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

impl ProductDraft {
    /// Validate the draft.
    ///
    /// Name and both rates are required; selling rate must exceed purchase
    /// rate. Quantity and GST default to zero when left blank.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate(&self) -> Result<ProductInput, ValidationError> {
        let name = required(&self.name, "Name")?;
        let purchase_rate = parse_decimal(&self.purchase_rate, "Purchase rate")?;
        let selling_rate = parse_decimal(&self.selling_rate, "Selling rate")?;

        if purchase_rate.is_sign_negative() {
            return Err(ValidationError::Negative {
                field: "Purchase rate",
            });
        }
        if selling_rate <= purchase_rate {
            return Err(ValidationError::SellingNotAbovePurchase);
        }

        let quantity = optional_whole(&self.quantity, "Quantity")?.unwrap_or(0);
        if quantity < 0 {
            return Err(ValidationError::Negative { field: "Quantity" });
        }

        let gst = optional_decimal(&self.gst, "GST")?.unwrap_or(Decimal::ZERO);
        if gst.is_sign_negative() || gst > MAX_GST_PERCENT {
            return Err(ValidationError::GstOutOfRange);
        }

        Ok(ProductInput {
            name,
            barcode: self.barcode.trim().to_string(),
            purchase_rate,
            selling_rate,
            quantity,
            gst,
            category: non_blank(&self.category),
            description: non_blank(&self.description),
        })
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Sell form as submitted, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleDraft {
    pub product_id: String,
    pub quantity: String,
    pub custom_selling_price: String,
}

impl SaleDraft {
    /// Validate against the product being sold.
    ///
    /// # Errors
    ///
    /// Returns an error when the quantity is missing, below one, or above the
    /// product's stock, or when a custom price is given but not positive.
    pub fn validate(&self, product: &Product) -> Result<SaleRequest, ValidationError> {
        let quantity = optional_whole(&self.quantity, "Quantity")?
            .ok_or(ValidationError::Required { field: "Quantity" })?;
        if quantity < 1 {
            return Err(ValidationError::NotPositive { field: "Quantity" });
        }
        if quantity > product.quantity {
            return Err(ValidationError::InsufficientStock {
                requested: quantity,
                available: product.quantity,
            });
        }

        let custom_selling_price =
            optional_decimal(&self.custom_selling_price, "Custom selling price")?;
        if custom_selling_price.is_some_and(|price| price <= Decimal::ZERO) {
            return Err(ValidationError::NotPositive {
                field: "Custom selling price",
            });
        }

        Ok(SaleRequest {
            product_id: product.id.clone(),
            quantity_sold: quantity,
            custom_selling_price,
        })
    }

    /// Parsed quantity, ignoring bounds. Used for the live quote.
    #[must_use]
    pub fn quantity_hint(&self) -> Option<i64> {
        self.quantity.trim().parse().ok()
    }

    /// Parsed custom price when present and positive.
    #[must_use]
    pub fn custom_price_hint(&self) -> Option<Decimal> {
        self.custom_selling_price
            .trim()
            .parse::<Decimal>()
            .ok()
            .filter(|price| *price > Decimal::ZERO)
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Check every open day has both times and closes after it opens.
///
/// # Errors
///
/// Returns the first offending day.
pub fn validate_hours(hours: &BusinessHours) -> Result<(), ValidationError> {
    for (day, entry) in hours.week() {
        if entry.closed {
            continue;
        }
        let label = day.label();
        let (open, close) = (entry.open.trim(), entry.close.trim());
        if open.is_empty() || close.is_empty() {
            return Err(ValidationError::HoursMissing { day: label });
        }
        let open = parse_time(open, day)?;
        let close = parse_time(close, day)?;
        if close <= open {
            return Err(ValidationError::HoursInverted { day: label });
        }
    }
    Ok(())
}

/// Tidy the contact section in place before it is submitted.
///
/// Blank phone and email rows are dropped, every email must parse, and at
/// most one entry per list stays primary.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] for the first bad address.
pub fn normalize_contact(settings: &mut Settings) -> Result<(), ValidationError> {
    settings.phone_numbers.retain(|p| !p.number.trim().is_empty());
    for phone in &mut settings.phone_numbers {
        phone.number = phone.number.trim().to_string();
    }

    settings.emails.retain(|e| !e.email.trim().is_empty());
    for entry in &mut settings.emails {
        let email = Email::parse(&entry.email).map_err(|source| ValidationError::InvalidEmail {
            email: entry.email.clone(),
            source,
        })?;
        entry.email = email.into_inner();
    }

    normalize_primary(&mut settings.phone_numbers);
    normalize_primary(&mut settings.emails);
    Ok(())
}

/// Check the login form: a valid email and a non-empty password.
///
/// # Errors
///
/// Returns an error for a malformed email or a blank password.
pub fn validate_login(email: &str, password: &str) -> Result<Email, ValidationError> {
    let email = Email::parse(email).map_err(|source| match source {
        EmailError::Empty => ValidationError::Required { field: "Email" },
        source => ValidationError::InvalidEmail {
            email: email.trim().to_string(),
            source,
        },
    })?;
    if password.is_empty() {
        return Err(ValidationError::Required { field: "Password" });
    }
    Ok(email)
}

// =============================================================================
// Helpers
// =============================================================================

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(value.to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_decimal(value: &str, field: &'static str) -> Result<Decimal, ValidationError> {
    optional_decimal(value, field)?.ok_or(ValidationError::Required { field })
}

fn optional_decimal(value: &str, field: &'static str) -> Result<Option<Decimal>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<Decimal>()
        .map(Some)
        .map_err(|_| ValidationError::NotANumber { field })
}

fn optional_whole(value: &str, field: &'static str) -> Result<Option<i64>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(_) if value.parse::<Decimal>().is_ok() => {
            Err(ValidationError::NotAWholeNumber { field })
        }
        Err(_) => Err(ValidationError::NotANumber { field }),
    }
}

fn parse_time(value: &str, day: Weekday) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::HoursInvalid { day: day.label() })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{DayHours, EmailEntry, PhoneNumber};
    use rust_decimal::dec;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: " Linen Kurta ".into(),
            purchase_rate: "100".into(),
            selling_rate: "150".into(),
            quantity: "20".into(),
            ..ProductDraft::default()
        }
    }

    fn kurta(quantity: i64) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Kurta",
            "purchaseRate": 100,
            "sellingRate": 150,
            "quantity": quantity,
        }))
        .unwrap()
    }

    #[test]
    fn test_product_draft_valid() {
        let input = draft().validate().unwrap();
        assert_eq!(input.name, "Linen Kurta");
        assert_eq!(input.selling_rate, dec!(150));
        assert_eq!(input.gst, Decimal::ZERO);
        assert_eq!(input.category, None);
    }

    #[test]
    fn test_selling_must_exceed_purchase() {
        let equal = ProductDraft {
            selling_rate: "100".into(),
            ..draft()
        };
        assert_eq!(
            equal.validate(),
            Err(ValidationError::SellingNotAbovePurchase)
        );

        let below = ProductDraft {
            selling_rate: "99.99".into(),
            ..draft()
        };
        assert_eq!(
            below.validate(),
            Err(ValidationError::SellingNotAbovePurchase)
        );
    }

    #[test]
    fn test_product_required_and_numeric() {
        let nameless = ProductDraft {
            name: "   ".into(),
            ..draft()
        };
        assert_eq!(
            nameless.validate(),
            Err(ValidationError::Required { field: "Name" })
        );

        let garbage = ProductDraft {
            purchase_rate: "abc".into(),
            ..draft()
        };
        assert_eq!(
            garbage.validate(),
            Err(ValidationError::NotANumber {
                field: "Purchase rate"
            })
        );

        let fractional = ProductDraft {
            quantity: "2.5".into(),
            ..draft()
        };
        assert_eq!(
            fractional.validate(),
            Err(ValidationError::NotAWholeNumber { field: "Quantity" })
        );

        let gst = ProductDraft {
            gst: "101".into(),
            ..draft()
        };
        assert_eq!(gst.validate(), Err(ValidationError::GstOutOfRange));
    }

    #[test]
    fn test_draft_from_product_round_trips() {
        let product = kurta(7);
        let input = ProductDraft::from(&product).validate().unwrap();
        assert_eq!(input.quantity, 7);
        assert_eq!(input.purchase_rate, dec!(100));
    }

    #[test]
    fn test_sale_quantity_bounded_by_stock() {
        let product = kurta(20);
        let over = SaleDraft {
            quantity: "21".into(),
            ..SaleDraft::default()
        };
        assert_eq!(
            over.validate(&product),
            Err(ValidationError::InsufficientStock {
                requested: 21,
                available: 20
            })
        );

        let exact = SaleDraft {
            quantity: "20".into(),
            ..SaleDraft::default()
        };
        let request = exact.validate(&product).unwrap();
        assert_eq!(request.quantity_sold, 20);
        assert_eq!(request.product_id.as_str(), "p1");
    }

    #[test]
    fn test_sale_quantity_and_price_positive() {
        let product = kurta(20);
        let zero = SaleDraft {
            quantity: "0".into(),
            ..SaleDraft::default()
        };
        assert_eq!(
            zero.validate(&product),
            Err(ValidationError::NotPositive { field: "Quantity" })
        );

        let blank = SaleDraft::default();
        assert_eq!(
            blank.validate(&product),
            Err(ValidationError::Required { field: "Quantity" })
        );

        let free = SaleDraft {
            quantity: "1".into(),
            custom_selling_price: "0".into(),
            ..SaleDraft::default()
        };
        assert!(matches!(
            free.validate(&product),
            Err(ValidationError::NotPositive { .. })
        ));

        let custom = SaleDraft {
            quantity: "1".into(),
            custom_selling_price: "120.50".into(),
            ..SaleDraft::default()
        };
        assert_eq!(
            custom.validate(&product).unwrap().custom_selling_price,
            Some(dec!(120.50))
        );
    }

    #[test]
    fn test_hours_checks() {
        let mut hours = BusinessHours::default();
        for day in Weekday::ALL {
            hours.0.insert(
                day,
                DayHours {
                    open: "10:00".into(),
                    close: "20:00".into(),
                    closed: false,
                },
            );
        }
        assert!(validate_hours(&hours).is_ok());

        hours.0.insert(
            Weekday::Wednesday,
            DayHours {
                open: "18:00".into(),
                close: "09:00".into(),
                closed: false,
            },
        );
        assert_eq!(
            validate_hours(&hours),
            Err(ValidationError::HoursInverted { day: "Wednesday" })
        );

        hours.0.insert(
            Weekday::Wednesday,
            DayHours {
                open: "10:00".into(),
                close: String::new(),
                closed: false,
            },
        );
        assert_eq!(
            validate_hours(&hours),
            Err(ValidationError::HoursMissing { day: "Wednesday" })
        );

        // a closed day is not checked
        hours.0.get_mut(&Weekday::Wednesday).unwrap().closed = true;
        assert!(validate_hours(&hours).is_ok());
    }

    #[test]
    fn test_normalize_contact() {
        let mut settings = Settings {
            phone_numbers: vec![
                PhoneNumber {
                    number: "  ".into(),
                    is_primary: true,
                    ..PhoneNumber::default()
                },
                PhoneNumber {
                    number: " 98450 00000 ".into(),
                    is_primary: true,
                    ..PhoneNumber::default()
                },
                PhoneNumber {
                    number: "98450 11111".into(),
                    is_primary: true,
                    ..PhoneNumber::default()
                },
            ],
            emails: vec![EmailEntry {
                email: " hello@shop.in ".into(),
                ..EmailEntry::default()
            }],
            ..Settings::default()
        };
        normalize_contact(&mut settings).unwrap();
        assert_eq!(settings.phone_numbers.len(), 2);
        assert_eq!(settings.phone_numbers[0].number, "98450 00000");
        assert!(settings.phone_numbers[0].is_primary);
        assert!(!settings.phone_numbers[1].is_primary);
        assert_eq!(settings.emails[0].email, "hello@shop.in");

        settings.emails.push(EmailEntry {
            email: "not-an-email".into(),
            ..EmailEntry::default()
        });
        assert!(matches!(
            normalize_contact(&mut settings),
            Err(ValidationError::InvalidEmail { .. })
        ));
    }

    #[test]
    fn test_login_form() {
        assert!(validate_login("owner@shop.in", "secret").is_ok());
        assert_eq!(
            validate_login("", "secret"),
            Err(ValidationError::Required { field: "Email" })
        );
        assert_eq!(
            validate_login("owner@shop.in", ""),
            Err(ValidationError::Required { field: "Password" })
        );
    }
}
