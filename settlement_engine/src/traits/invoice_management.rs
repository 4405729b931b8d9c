use thiserror::Error;

use crate::db_types::{Invoice, InvoiceId, NewInvoice, PaymentConfirmation, SettlementUpdate};

#[allow(async_fn_in_trait)]
pub trait InvoiceManagement {
    /// Fetches the invoice with the given id, or `None` if it does not exist.
    async fn fetch_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceApiError>;

    /// Fetches the invoice that the given gateway order was created for.
    async fn fetch_invoice_by_gateway_order(&self, order_id: &str) -> Result<Option<Invoice>, InvoiceApiError>;

    /// Stores a new invoice in the `pending` state and returns the stored record.
    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceApiError>;

    /// Records the gateway order id against an invoice. Only `pending` invoices accept a gateway order, and the first
    /// order attached to an invoice is never replaced.
    ///
    /// Returns the invoice with its stored order id (which may differ from `order_id`), or `None` if there is no
    /// pending invoice with the given id.
    async fn attach_gateway_order(&self, id: &InvoiceId, order_id: &str) -> Result<Option<Invoice>, InvoiceApiError>;

    /// Marks an invoice as paid.
    ///
    /// This is a single conditional update: the payment id, signature and `paid_at` are written **only if** the
    /// invoice is currently `pending` (and, if `require_order_match` is set, its gateway order id matches). When the
    /// update does not apply, the current state of the invoice is inspected and reported without modification:
    /// * [`SettlementUpdate::Settled`] - this call performed the transition.
    /// * [`SettlementUpdate::AlreadyPaid`] - the invoice was already paid by this same payment.
    /// * [`SettlementUpdate::NotPayable`] - the invoice is cancelled, was paid by another payment, or the gateway
    ///   order does not match.
    /// * [`SettlementUpdate::NotFound`] - no such invoice.
    async fn mark_invoice_paid(&self, confirmation: PaymentConfirmation) -> Result<SettlementUpdate, InvoiceApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum InvoiceApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invoice {0} already exists")]
    InvoiceAlreadyExists(InvoiceId),
    #[error("Invalid invoice: {0}")]
    InvalidInvoice(String),
}

impl From<sqlx::Error> for InvoiceApiError {
    fn from(e: sqlx::Error) -> Self {
        InvoiceApiError::DatabaseError(e.to_string())
    }
}
