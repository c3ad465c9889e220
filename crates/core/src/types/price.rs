//! Type-safe price representation using decimal arithmetic.
//!
//! All prices are in Egyptian pounds; the shop has a single currency so the
//! type carries only the amount.

use std::fmt;
use std::iter::Sum;
use std::ops::Mul;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// A non-negative price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero pounds.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPrice`] if the amount is negative.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::InvalidPrice(amount.to_string()));
        }
        Ok(Self(amount))
    }

    /// Parse user input such as `"120"` or `" 45.50 "`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for blank input and
    /// [`ValidationError::InvalidPrice`] for non-numeric or negative input.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField("price"));
        }
        let amount = Decimal::from_str(trimmed)
            .map_err(|_| ValidationError::InvalidPrice(trimmed.to_string()))?;
        Self::new(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `"45.50"`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}
