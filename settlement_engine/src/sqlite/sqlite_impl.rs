//! `SqliteDatabase` is a concrete implementation of a settlement engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{invoices, new_pool, notifications};
use crate::{
    db_types::{
        Invoice,
        InvoiceId,
        InvoiceStatus,
        NewInvoice,
        NewNotification,
        Notification,
        PaymentConfirmation,
        SettlementUpdate,
    },
    traits::{
        InvoiceApiError,
        InvoiceManagement,
        NotificationApiError,
        NotificationManagement,
        SettlementDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SettlementDatabase for SqliteDatabase {}

impl InvoiceManagement for SqliteDatabase {
    async fn fetch_invoice(&self, id: &InvoiceId) -> Result<Option<Invoice>, InvoiceApiError> {
        let mut conn = self.pool.acquire().await?;
        invoices::fetch_invoice(id, &mut conn).await
    }

    async fn fetch_invoice_by_gateway_order(&self, order_id: &str) -> Result<Option<Invoice>, InvoiceApiError> {
        let mut conn = self.pool.acquire().await?;
        invoices::fetch_invoice_by_gateway_order(order_id, &mut conn).await
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> Result<Invoice, InvoiceApiError> {
        let mut tx = self.pool.begin().await?;
        let invoice = invoices::insert_invoice(invoice, &mut tx).await?;
        tx.commit().await?;
        Ok(invoice)
    }

    async fn attach_gateway_order(&self, id: &InvoiceId, order_id: &str) -> Result<Option<Invoice>, InvoiceApiError> {
        let mut tx = self.pool.begin().await?;
        let invoice = invoices::attach_gateway_order(id, order_id, &mut tx).await?;
        tx.commit().await?;
        Ok(invoice)
    }

    /// Runs the conditional update and, if it did not apply, classifies the current state of the invoice, all in a
    /// single transaction.
    async fn mark_invoice_paid(&self, confirmation: PaymentConfirmation) -> Result<SettlementUpdate, InvoiceApiError> {
        let mut tx = self.pool.begin().await?;
        let update = match invoices::mark_paid(&confirmation, &mut tx).await? {
            Some(invoice) => {
                debug!("🗃️ Invoice {} marked as paid by payment {}", invoice.id, confirmation.razorpay_payment_id);
                SettlementUpdate::Settled(invoice)
            },
            None => match invoices::fetch_invoice(&confirmation.invoice_id, &mut tx).await? {
                None => SettlementUpdate::NotFound,
                Some(invoice) if is_replay(&invoice, &confirmation) => {
                    debug!("🗃️ Invoice {} is already paid by this payment. Nothing to update.", invoice.id);
                    SettlementUpdate::AlreadyPaid(invoice)
                },
                Some(invoice) => {
                    debug!(
                        "🗃️ Invoice {} cannot be paid with order {} / payment {}. Status: {}, stored order: {:?}",
                        invoice.id,
                        confirmation.razorpay_order_id,
                        confirmation.razorpay_payment_id,
                        invoice.status,
                        invoice.razorpay_order_id
                    );
                    SettlementUpdate::NotPayable(invoice)
                },
            },
        };
        tx.commit().await?;
        Ok(update)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notifications(
        &self,
        notifications: &[NewNotification],
    ) -> Result<Vec<Notification>, NotificationApiError> {
        let mut tx = self.pool.begin().await?;
        let mut result = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let stored = notifications::insert_notification(notification, &mut tx).await?;
            trace!("🗃️ Notification #{} stored for {}", stored.id, stored.user_id);
            result.push(stored);
        }
        tx.commit().await?;
        Ok(result)
    }

    async fn notifications_for_user(&self, user_id: &str) -> Result<Vec<Notification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        notifications::notifications_for_user(user_id, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Already-applied migrations are skipped.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}

/// A paid invoice only reports `AlreadyPaid` to the payment that settled it. Any other payment, even one with a
/// valid signature, did not pay this invoice.
fn is_replay(invoice: &Invoice, confirmation: &PaymentConfirmation) -> bool {
    invoice.status == InvoiceStatus::Paid
        && invoice.razorpay_payment_id.as_deref() == Some(confirmation.razorpay_payment_id.as_str())
        && (!confirmation.require_order_match
            || invoice.razorpay_order_id.as_deref() == Some(confirmation.razorpay_order_id.as_str()))
}
