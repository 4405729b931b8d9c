use log::*;
use razorpay_tools::signature::verify_payment_signature;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Invoice, InvoiceId, PaymentConfirmation},
    SettlementError,
};

/// The proof of payment that the checkout widget hands back after a successful charge.
///
/// Missing fields deserialize as empty strings. An empty field can never carry a valid signature, so it is rejected
/// by [`PaymentProof::verify`] like any other tampered value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProof {
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
    #[serde(default)]
    pub invoice_id: String,
}

impl PaymentProof {
    pub fn new(order_id: &str, payment_id: &str, signature: &str, invoice_id: &str) -> Self {
        Self {
            razorpay_order_id: order_id.into(),
            razorpay_payment_id: payment_id.into(),
            razorpay_signature: signature.into(),
            invoice_id: invoice_id.into(),
        }
    }

    /// Checks the gateway signature over `order_id|payment_id` with the shared secret.
    pub fn verify(self, secret: &str) -> Result<VerifiedPayment, SettlementError> {
        if verify_payment_signature(secret, &self.razorpay_order_id, &self.razorpay_payment_id, &self.razorpay_signature)
        {
            trace!("🔐️ Signature for payment {} on invoice {} is valid", self.razorpay_payment_id, self.invoice_id);
            Ok(VerifiedPayment { proof: self })
        } else {
            warn!(
                "🔐️ Rejected payment {} for order {} on invoice {}: signature mismatch",
                self.razorpay_payment_id, self.razorpay_order_id, self.invoice_id
            );
            Err(SettlementError::InvalidSignature)
        }
    }
}

/// A [`PaymentProof`] whose signature has been checked. There is no other way to construct one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    proof: PaymentProof,
}

impl VerifiedPayment {
    pub fn invoice_id(&self) -> InvoiceId {
        InvoiceId::from(self.proof.invoice_id.as_str())
    }

    pub fn order_id(&self) -> &str {
        &self.proof.razorpay_order_id
    }

    pub fn payment_id(&self) -> &str {
        &self.proof.razorpay_payment_id
    }

    pub fn to_confirmation(&self, require_order_match: bool) -> PaymentConfirmation {
        PaymentConfirmation {
            invoice_id: self.invoice_id(),
            razorpay_order_id: self.proof.razorpay_order_id.clone(),
            razorpay_payment_id: self.proof.razorpay_payment_id.clone(),
            razorpay_signature: self.proof.razorpay_signature.clone(),
            require_order_match,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementResult {
    /// This call moved the invoice to `paid`.
    Settled { invoice: Invoice, notifications_sent: bool },
    /// The invoice had already been settled by an earlier call. Nothing was changed and nobody was notified.
    AlreadyPaid { invoice: Invoice },
}

impl SettlementResult {
    pub fn invoice(&self) -> &Invoice {
        match self {
            SettlementResult::Settled { invoice, .. } => invoice,
            SettlementResult::AlreadyPaid { invoice } => invoice,
        }
    }

    pub fn is_already_paid(&self) -> bool {
        matches!(self, SettlementResult::AlreadyPaid { .. })
    }
}
