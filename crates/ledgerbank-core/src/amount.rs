//! Validated money amounts.
//!
//! Clients send amounts in major units as JSON numbers (`100` or `12.5`). Everything
//! past the request boundary works in integer cents.

use std::fmt;

use crate::error::BankError;

/// Largest accepted amount in cents. Keeps every accepted value exactly representable
/// as an `f64` on the way in and far from `i64` overflow.
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000_000_000_000;

/// A strictly positive amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Create an amount from cents.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidAmount` if `cents` is not in `1..=MAX_AMOUNT_CENTS`.
    pub fn from_cents(cents: i64) -> Result<Self, BankError> {
        if cents <= 0 {
            return Err(BankError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        if cents > MAX_AMOUNT_CENTS {
            return Err(BankError::InvalidAmount("amount is too large".into()));
        }
        Ok(Self(cents))
    }

    /// Create an amount from major units, rounding to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidAmount` for non-finite, non-positive or oversized values,
    /// and for values that round to zero cents.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_major(major: f64) -> Result<Self, BankError> {
        if !major.is_finite() {
            return Err(BankError::InvalidAmount("amount must be a finite number".into()));
        }
        let cents = (major * 100.0).round();
        if cents > MAX_AMOUNT_CENTS as f64 {
            return Err(BankError::InvalidAmount("amount is too large".into()));
        }
        Self::from_cents(cents as i64)
    }

    /// Parse the `amount` field of a request body.
    ///
    /// Only JSON numbers are accepted; a missing field, `null`, strings and booleans
    /// are all rejected.
    ///
    /// # Errors
    ///
    /// Returns `BankError::InvalidAmount` if the value is missing, not a number, or
    /// fails [`Amount::from_major`].
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, BankError> {
        match value {
            None | Some(serde_json::Value::Null) => {
                Err(BankError::InvalidAmount("amount is required".into()))
            }
            Some(serde_json::Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| BankError::InvalidAmount("amount must be a number".into()))
                .and_then(Self::from_major),
            Some(_) => Err(BankError::InvalidAmount("amount must be a number".into())),
        }
    }

    /// The amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cents(self.0))
    }
}

/// Format cents as a major-unit decimal string with two places (`12345` → `"123.45"`).
#[must_use]
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Convert cents to major units for display.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cents_to_major(cents: i64) -> f64 {
    cents as f64 / 100.0
}
