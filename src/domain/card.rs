use crate::error::{CheckoutError, Result};
use std::fmt;

/// Card data collected for a single checkout session.
///
/// Ephemeral by contract: it lives inside the session context, travels to the
/// gateway once for tokenization and is cleared as soon as the transaction
/// reaches a terminal status. `Debug` masks the PAN and CVC so the value can
/// appear in logs without leaking card data.
#[derive(Clone, PartialEq, Eq)]
pub struct CardInstrument {
    pub number: String,
    pub cvc: String,
    pub exp_month: String,
    pub exp_year: String,
    pub holder: String,
}

impl CardInstrument {
    /// Normalizes the instrument into the shape the gateway expects:
    /// digits-only PAN, two-digit month, two-digit year, trimmed holder.
    pub fn normalized(&self) -> CardInstrument {
        let year = if self.exp_year.len() > 2 {
            self.exp_year[self.exp_year.len() - 2..].to_string()
        } else {
            format!("{:0>2}", self.exp_year)
        };
        CardInstrument {
            number: self.number.replace(' ', ""),
            cvc: self.cvc.clone(),
            exp_month: format!("{:0>2}", self.exp_month),
            exp_year: year,
            holder: self.holder.trim().to_string(),
        }
    }

    /// Shape checks on an already-normalized instrument.
    pub fn validate(&self) -> Result<()> {
        if self.number.len() != 16 || !self.number.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::Validation(
                "card number must be 16 digits".to_string(),
            ));
        }
        if self.cvc.len() != 3 || !self.cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(CheckoutError::Validation(
                "security code must be 3 digits".to_string(),
            ));
        }
        match self.exp_month.parse::<u8>() {
            Ok(m) if (1..=12).contains(&m) => {}
            _ => {
                return Err(CheckoutError::Validation(
                    "expiry month must be between 01 and 12".to_string(),
                ));
            }
        }
        if self.exp_year.len() != 2 || self.exp_year.parse::<u8>().is_err() {
            return Err(CheckoutError::Validation(
                "expiry year must be two digits".to_string(),
            ));
        }
        if self.holder.is_empty() {
            return Err(CheckoutError::Validation(
                "card holder name is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn last_four(&self) -> String {
        let digits: String = self.number.chars().filter(|c| c.is_ascii_digit()).collect();
        let start = digits.len().saturating_sub(4);
        digits[start..].to_string()
    }
}

impl fmt::Debug for CardInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardInstrument")
            .field("number", &format!("****{}", self.last_four()))
            .field("cvc", &"***")
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("holder", &self.holder)
            .finish()
    }
}
