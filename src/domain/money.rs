use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A positive monetary amount in integer minor units (cents).
///
/// Both external systems express money this way, so no decimal type is
/// involved anywhere; the wrapper exists to reject zero and negative values
/// at the point where an amount is about to be charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub fn new(minor_units: i64) -> Result<Self, CheckoutError> {
        if minor_units > 0 {
            Ok(Self(minor_units))
        } else {
            Err(CheckoutError::Validation(
                "amount must be positive".to_string(),
            ))
        }
    }

    pub fn in_minor_units(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Amount {
    type Error = CheckoutError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_minor_units(self.0))
    }
}

/// Renders minor units as major units with two decimals, e.g. `10000` → `"100.00"`.
pub fn format_minor_units(minor_units: i64) -> String {
    format!("{}.{:02}", minor_units / 100, (minor_units % 100).abs())
}

/// The checkout cost summary shown before confirmation: a 0.5% shipping
/// charge and a 2% base fee on top of the product amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub amount: i64,
    pub shipping: i64,
    pub fee: i64,
}

// Round-half-up integer arithmetic; permille avoids intermediate floats.
fn permille_of(amount: i64, permille: i64) -> i64 {
    (amount * permille + 500) / 1000
}

impl FeeBreakdown {
    pub fn for_amount(amount: i64) -> Self {
        Self {
            amount,
            shipping: permille_of(amount, 5),
            fee: permille_of(amount, 20),
        }
    }

    pub fn total(&self) -> i64 {
        self.amount + self.shipping + self.fee
    }
}
