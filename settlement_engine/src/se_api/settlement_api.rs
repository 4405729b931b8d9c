use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Invoice, InvoiceId, NewNotification, Notification, SettlementUpdate},
    events::{EventProducers, InvoicePaidEvent},
    traits::SettlementDatabase,
    PaymentProof,
    SettlementError,
    SettlementResult,
    VerifiedPayment,
};

pub const NOTIFICATION_TYPE_PAYMENT: &str = "payment";

/// `InvoiceSettlementApi` turns a verified gateway payment into a paid invoice.
///
/// Settlement happens at most once per invoice. The first successful call performs the `pending → paid` transition,
/// stores one notification for the mechanic and one for the customer, and publishes an [`InvoicePaidEvent`]. Any
/// later call for the same invoice returns [`SettlementResult::AlreadyPaid`] and has no side effects.
pub struct InvoiceSettlementApi<B> {
    db: B,
    producers: EventProducers,
    strict_order_binding: bool,
}

impl<B> Debug for InvoiceSettlementApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvoiceSettlementApi (strict order binding: {})", self.strict_order_binding)
    }
}

impl<B> InvoiceSettlementApi<B> {
    /// Strict order binding is on by default.
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers, strict_order_binding: true }
    }

    /// When enabled, a payment only settles the invoice whose stored gateway order id equals the signed order id.
    /// Disabling it lets a valid signature settle whichever invoice the caller names.
    pub fn with_strict_order_binding(mut self, strict: bool) -> Self {
        self.strict_order_binding = strict;
        self
    }

}

impl<B> InvoiceSettlementApi<B>
where B: SettlementDatabase
{
    /// Convenience wrapper that checks the signature and then settles.
    pub async fn verify_and_settle(&self, proof: PaymentProof, secret: &str) -> Result<SettlementResult, SettlementError> {
        let payment = proof.verify(secret)?;
        self.settle_invoice(payment).await
    }

    pub async fn settle_invoice(&self, payment: VerifiedPayment) -> Result<SettlementResult, SettlementError> {
        let confirmation = payment.to_confirmation(self.strict_order_binding);
        let invoice_id = confirmation.invoice_id.clone();
        let update = self.db.mark_invoice_paid(confirmation).await.map_err(|e| {
            error!("🧾️ Could not mark invoice {invoice_id} as paid. {e}");
            SettlementError::update_failed(e.to_string())
        })?;
        match update {
            SettlementUpdate::Settled(invoice) => {
                info!(
                    "🧾️ Invoice {} ({}) settled for {} by payment {}",
                    invoice.id,
                    invoice.invoice_number,
                    invoice.total_amount,
                    payment.payment_id()
                );
                let notifications_sent = self.notify_parties(&invoice).await;
                self.producers.publish_invoice_paid(InvoicePaidEvent::new(invoice.clone(), notifications_sent)).await;
                Ok(SettlementResult::Settled { invoice, notifications_sent })
            },
            SettlementUpdate::AlreadyPaid(invoice) => {
                info!("🧾️ Invoice {} was already paid. No notifications sent.", invoice.id);
                Ok(SettlementResult::AlreadyPaid { invoice })
            },
            SettlementUpdate::NotPayable(invoice) => {
                warn!(
                    "🧾️ Payment {} for order {} cannot settle invoice {} (status {})",
                    payment.payment_id(),
                    payment.order_id(),
                    invoice.id,
                    invoice.status
                );
                Err(SettlementError::update_failed(format!("invoice {} is not payable with this order", invoice.id)))
            },
            SettlementUpdate::NotFound => {
                warn!("🧾️ Payment {} references unknown invoice {invoice_id}", payment.payment_id());
                Err(SettlementError::update_failed(format!("invoice {invoice_id} does not exist")))
            },
        }
    }

    /// Stores the mechanic and customer notifications together. The invoice has already been committed, so a failure
    /// here is logged and reported in the return value rather than propagated.
    async fn notify_parties(&self, invoice: &Invoice) -> bool {
        let notifications = payment_notifications(invoice);
        match self.db.insert_notifications(&notifications).await {
            Ok(stored) => {
                debug!("🧾️ {} payment notifications stored for invoice {}", stored.len(), invoice.id);
                true
            },
            Err(e) => {
                error!(
                    "🧾️ Invoice {} is paid, but the payment notifications could not be stored. The mechanic and \
                     customer will not be notified. {e}",
                    invoice.id
                );
                false
            },
        }
    }

    pub async fn fetch_invoice(&self, id: &InvoiceId) -> Result<Invoice, SettlementError> {
        self.db.fetch_invoice(id).await?.ok_or_else(|| SettlementError::InvoiceNotFound(id.clone()))
    }

    /// Records the gateway order created for a pending invoice. If the invoice already has an order, that order is kept
    /// and the returned invoice carries it.
    pub async fn attach_order(&self, id: &InvoiceId, order_id: &str) -> Result<Invoice, SettlementError> {
        match self.db.attach_gateway_order(id, order_id).await? {
            Some(invoice) => {
                debug!("🧾️ Gateway order {order_id} attached to invoice {id}");
                Ok(invoice)
            },
            None => {
                let invoice = self.fetch_invoice(id).await?;
                Err(SettlementError::InvoiceNotPending(invoice.id, invoice.status))
            },
        }
    }

    pub async fn notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, SettlementError> {
        let notifications = self.db.notifications_for_user(user_id).await?;
        Ok(notifications)
    }
}

/// The pair of notifications for a settled invoice: the mechanic's first, then the customer's.
pub fn payment_notifications(invoice: &Invoice) -> [NewNotification; 2] {
    let amount = invoice.total_amount;
    let number = &invoice.invoice_number;
    let mechanic = NewNotification::new(
        &invoice.mechanic_id,
        "Payment Received!",
        format!("You received a payment of ₹{amount} for invoice {number}."),
        NOTIFICATION_TYPE_PAYMENT,
    )
    .with_related_request(invoice.service_request_id.clone());
    let customer = NewNotification::new(
        &invoice.customer_id,
        "Payment Successful",
        format!("Your payment of ₹{amount} for invoice {number} was successful."),
        NOTIFICATION_TYPE_PAYMENT,
    )
    .with_related_request(invoice.service_request_id.clone());
    [mechanic, customer]
}
