use thiserror::Error;

use crate::{
    db_types::{InvoiceId, InvoiceStatus},
    traits::{InvoiceApiError, NotificationApiError},
};

#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Invalid payment signature")]
    InvalidSignature,
    /// The conditional update did not apply, or the store reported an error. The reason is for logs only; callers
    /// see the generic message.
    #[error("Failed to update invoice")]
    InvoiceUpdateFailed { reason: String },
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),
    #[error("Invoice {0} is {1} and cannot accept payments")]
    InvoiceNotPending(InvoiceId, InvoiceStatus),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl SettlementError {
    pub fn update_failed<S: Into<String>>(reason: S) -> Self {
        Self::InvoiceUpdateFailed { reason: reason.into() }
    }
}

impl From<InvoiceApiError> for SettlementError {
    fn from(e: InvoiceApiError) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}

impl From<NotificationApiError> for SettlementError {
    fn from(e: NotificationApiError) -> Self {
        SettlementError::DatabaseError(e.to_string())
    }
}
