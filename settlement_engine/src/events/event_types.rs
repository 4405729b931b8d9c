use chrono::{DateTime, Utc};

use crate::db_types::Invoice;

/// Emitted exactly once per invoice, after it has been committed as `paid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoicePaidEvent {
    pub invoice: Invoice,
    /// Whether the payer and payee notifications were stored alongside the transition.
    pub notifications_sent: bool,
}

impl InvoicePaidEvent {
    pub fn new(invoice: Invoice, notifications_sent: bool) -> Self {
        Self { invoice, notifications_sent }
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.invoice.paid_at
    }
}
