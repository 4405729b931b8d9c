use serde::{Deserialize, Serialize};
use settlement_engine::{db_types::Amount, SettlementResult};

/// The body of a successful payment verification: `{"success": true}`, plus `"already_paid": true` when the invoice
/// had been settled by an earlier call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub already_paid: bool,
}

impl From<&SettlementResult> for VerificationResponse {
    fn from(result: &SettlementResult) -> Self {
        Self { success: true, already_paid: result.is_already_paid() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub invoice_id: String,
}

/// Everything the checkout widget needs to open a payment for an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// In the smallest currency unit, as the checkout widget expects.
    pub amount: Amount,
    pub currency: String,
    pub key_id: String,
}
