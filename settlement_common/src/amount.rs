use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";

//--------------------------------------       Amount        ---------------------------------------------------------
/// A currency amount, held in minor units (paise for INR). This is also the unit the payment gateway expects.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Amount(i64);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented as a currency amount: {0}")]
pub struct AmountConversionError(String);

impl Amount {
    pub fn from_minor_units(value: i64) -> Self {
        Self(value)
    }

    /// Converts whole rupees to paise. Fails if the result does not fit in an `i64`.
    pub fn from_major_units(value: i64) -> Result<Self, AmountConversionError> {
        value.checked_mul(100).map(Self).ok_or_else(|| AmountConversionError(format!("{value} rupees is out of range")))
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
