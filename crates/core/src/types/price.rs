//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are stored as `NUMERIC(10,2)` in rupees. The payment
//! gateway works in the smallest currency unit (paise), see
//! [`Price::minor_units`].

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a price from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// No amount was given.
    #[error("price is required")]
    Empty,
    /// The amount is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
    /// The amount has more than two decimal places.
    #[error("price can have at most two decimal places")]
    TooPrecise,
    /// The amount does not fit the catalog column.
    #[error("price is too large")]
    TooLarge,
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in Indian rupees.
    #[must_use]
    pub const fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }

    /// Largest amount that fits `NUMERIC(10,2)`.
    #[must_use]
    pub const fn max_amount() -> Decimal {
        Decimal::from_parts(1_410_065_407, 2, 0, false, 2)
    }

    /// Parse a catalog amount from a form field.
    ///
    /// Accepts plain decimals such as `8999`, `8999.5` or `8,999.00`
    /// (thousands separators are ignored).
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the input is empty, not a number, not
    /// positive, has more than two decimal places, or exceeds
    /// [`Price::max_amount`].
    pub fn parse_amount(input: &str) -> Result<Decimal, PriceError> {
        let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount: Decimal = cleaned.parse().map_err(|_| PriceError::NotANumber)?;
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount > Self::max_amount() {
            return Err(PriceError::TooLarge);
        }

        Ok(amount.round_dp(2))
    }

    /// Amount in the smallest currency unit, as the payment gateway expects.
    ///
    /// Returns `None` if the amount does not fit an `i64`.
    #[must_use]
    pub fn minor_units(&self) -> Option<i64> {
        (self.amount.round_dp(2) * Decimal::ONE_HUNDRED).to_i64()
    }

    /// Format for display, e.g. `₹8,999.00`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.amount.round_dp(2);
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let text = format!("{:.2}", rounded.abs());
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        let grouped = match self.currency_code {
            CurrencyCode::INR => group_indian(whole),
            CurrencyCode::USD | CurrencyCode::EUR | CurrencyCode::GBP => group_thousands(whole),
        };

        format!("{sign}{}{grouped}.{fraction}", self.currency_code.symbol())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes supported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Currency symbol used when formatting.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

/// Group digits as lakh/crore: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    if !rest.is_empty() {
        groups.push(rest);
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// Group digits in threes.
fn group_thousands(digits: &str) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = digits;
    while rest.len() > 3 {
        let (left, right) = rest.split_at(rest.len() - 3);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();
    groups.join(",")
}
