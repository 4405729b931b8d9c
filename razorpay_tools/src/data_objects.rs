use serde::{Deserialize, Serialize};
use serde_json::Value;
use settlement_common::Amount;

/// The request body for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRazorpayOrder {
    /// Amount in the smallest currency unit.
    pub amount: Amount,
    pub currency: String,
    /// Merchant reference for the order. We use the invoice number.
    pub receipt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Value>,
}

impl NewRazorpayOrder {
    pub fn new(amount: Amount, currency: &str, receipt: &str) -> Self {
        Self { amount, currency: currency.into(), receipt: receipt.into(), notes: None }
    }

    pub fn with_notes(mut self, notes: Value) -> Self {
        self.notes = Some(notes);
        self
    }
}

/// An order as returned by the Razorpay Orders API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RazorpayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: Amount,
    #[serde(default)]
    pub amount_paid: Amount,
    #[serde(default)]
    pub amount_due: Amount,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    /// Razorpay returns `[]` when there are no notes, and an object otherwise.
    #[serde(default)]
    pub notes: Value,
    pub created_at: i64,
}
