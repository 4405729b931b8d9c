use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
pub use settlement_common::Amount;
use sqlx::{FromRow, Type};

//--------------------------------------       InvoiceId       -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct InvoiceId(pub String);

impl<S: Into<String>> From<S> for InvoiceId {
    fn from(s: S) -> Self {
        Self(s.into())
    }
}

impl Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl InvoiceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------     InvoiceStatus     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// The invoice has been issued to the customer and is awaiting payment.
    Pending,
    /// The gateway confirmed payment. Terminal.
    Paid,
    /// The invoice was withdrawn before it was paid. Terminal.
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvoiceStatus::Pending)
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

//--------------------------------------        Invoice        -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub total_amount: Amount,
    pub currency: String,
    pub status: InvoiceStatus,
    pub mechanic_id: String,
    pub customer_id: String,
    pub service_request_id: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewInvoice      -------------------------------------------------------
/// An invoice as produced by invoice generation. New invoices are always `pending`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub total_amount: Amount,
    pub currency: String,
    pub mechanic_id: String,
    pub customer_id: String,
    pub service_request_id: Option<String>,
    /// Set when the gateway order is created together with the invoice.
    pub razorpay_order_id: Option<String>,
}

impl NewInvoice {
    pub fn new<I: Into<InvoiceId>>(
        id: I,
        invoice_number: &str,
        total_amount: Amount,
        mechanic_id: &str,
        customer_id: &str,
    ) -> Self {
        Self {
            id: id.into(),
            invoice_number: invoice_number.into(),
            total_amount,
            currency: settlement_common::DEFAULT_CURRENCY_CODE.into(),
            mechanic_id: mechanic_id.into(),
            customer_id: customer_id.into(),
            service_request_id: None,
            razorpay_order_id: None,
        }
    }

    pub fn with_service_request(mut self, service_request_id: &str) -> Self {
        self.service_request_id = Some(service_request_id.into());
        self
    }

    pub fn with_razorpay_order(mut self, order_id: &str) -> Self {
        self.razorpay_order_id = Some(order_id.into());
        self
    }
}

//--------------------------------------  PaymentConfirmation  -------------------------------------------------------
/// The values written onto an invoice when it is marked as paid.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub invoice_id: InvoiceId,
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// When true, the invoice's stored gateway order id must equal `razorpay_order_id` for the update to apply.
    pub require_order_match: bool,
}

//--------------------------------------    SettlementUpdate   -------------------------------------------------------
/// The outcome of the conditional `pending → paid` update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementUpdate {
    /// This call moved the invoice from `pending` to `paid`. Contains the updated record.
    Settled(Invoice),
    /// The invoice was already `paid` by this same payment. Nothing was changed.
    AlreadyPaid(Invoice),
    /// The invoice exists but cannot be paid with this confirmation (it is cancelled, was paid by a different
    /// payment, or the gateway order does not belong to it). Nothing was changed.
    NotPayable(Invoice),
    NotFound,
}

//--------------------------------------     Notification      -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub related_request_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    NewNotification    -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub related_request_id: Option<String>,
}

impl NewNotification {
    pub fn new(user_id: &str, title: &str, message: String, notification_type: &str) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            message,
            notification_type: notification_type.into(),
            related_request_id: None,
        }
    }

    pub fn with_related_request(mut self, request_id: Option<String>) -> Self {
        self.related_request_id = request_id;
        self
    }
}
