use chrono::Utc;
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::{
    db_types::{Invoice, InvoiceId, NewInvoice, PaymentConfirmation},
    traits::InvoiceApiError,
};

/// Inserts a new invoice. Fails with [`InvoiceApiError::InvoiceAlreadyExists`] if the id is taken.
///
/// This is not atomic. Embed the call in a transaction and pass `&mut *tx` if you need atomicity.
pub async fn insert_invoice(invoice: NewInvoice, conn: &mut SqliteConnection) -> Result<Invoice, InvoiceApiError> {
    if !invoice.total_amount.is_positive() {
        return Err(InvoiceApiError::InvalidInvoice(format!(
            "Invoice {} has a non-positive total of {}",
            invoice.id, invoice.total_amount
        )));
    }
    if fetch_invoice(&invoice.id, &mut *conn).await?.is_some() {
        return Err(InvoiceApiError::InvoiceAlreadyExists(invoice.id));
    }
    let now = Utc::now();
    let invoice: Invoice = sqlx::query_as(
        r#"
            INSERT INTO invoices (
                id,
                invoice_number,
                total_amount,
                currency,
                status,
                mechanic_id,
                customer_id,
                service_request_id,
                razorpay_order_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7, $8, $9, $10)
            RETURNING *;
        "#,
    )
    .bind(invoice.id)
    .bind(invoice.invoice_number)
    .bind(invoice.total_amount)
    .bind(invoice.currency)
    .bind(invoice.mechanic_id)
    .bind(invoice.customer_id)
    .bind(invoice.service_request_id)
    .bind(invoice.razorpay_order_id)
    .bind(now)
    .bind(now)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Invoice {} ({}) inserted for {}", invoice.id, invoice.invoice_number, invoice.total_amount);
    Ok(invoice)
}

pub async fn fetch_invoice(id: &InvoiceId, conn: &mut SqliteConnection) -> Result<Option<Invoice>, InvoiceApiError> {
    let invoice = sqlx::query_as("SELECT * FROM invoices WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(invoice)
}

pub async fn fetch_invoice_by_gateway_order(
    order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Invoice>, InvoiceApiError> {
    let invoice = sqlx::query_as("SELECT * FROM invoices WHERE razorpay_order_id = $1")
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(invoice)
}

/// Records `order_id` against a pending invoice that has no gateway order yet. An order that is already attached is
/// kept, so every checkout for the invoice pays into the same order. Returns `None` if the invoice is not pending.
///
/// The rows are drained with `fetch_all` so that the update has run to completion before the caller commits.
pub async fn attach_gateway_order(
    id: &InvoiceId,
    order_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Invoice>, InvoiceApiError> {
    let mut rows: Vec<Invoice> = sqlx::query_as(
        r#"
            UPDATE invoices
            SET razorpay_order_id = COALESCE(razorpay_order_id, $1), updated_at = $2
            WHERE id = $3 AND status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(Utc::now())
    .bind(id)
    .fetch_all(conn)
    .await?;
    let invoice = rows.pop();
    let stored = invoice.as_ref().and_then(|i| i.razorpay_order_id.as_deref());
    trace!("🗃️ Gateway order {order_id} offered to invoice {id}. Stored order: {stored:?}");
    Ok(invoice)
}

/// The compare-and-set at the heart of settlement. The row is only touched if it is still `pending` (and the gateway
/// order matches, if required), so of any number of racing calls, at most one receives `Some`.
pub async fn mark_paid(
    confirmation: &PaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<Option<Invoice>, InvoiceApiError> {
    let sql = if confirmation.require_order_match {
        r#"
            UPDATE invoices
            SET status = 'paid', razorpay_payment_id = $1, razorpay_signature = $2, paid_at = $3, updated_at = $4
            WHERE id = $5 AND status = 'pending' AND razorpay_order_id = $6
            RETURNING *;
        "#
    } else {
        r#"
            UPDATE invoices
            SET status = 'paid', razorpay_payment_id = $1, razorpay_signature = $2, paid_at = $3, updated_at = $4
            WHERE id = $5 AND status = 'pending'
            RETURNING *;
        "#
    };
    let now = Utc::now();
    let mut query = sqlx::query_as(sql)
        .bind(&confirmation.razorpay_payment_id)
        .bind(&confirmation.razorpay_signature)
        .bind(now)
        .bind(now)
        .bind(&confirmation.invoice_id);
    if confirmation.require_order_match {
        query = query.bind(&confirmation.razorpay_order_id);
    }
    let mut rows: Vec<Invoice> = query.fetch_all(conn).await?;
    Ok(rows.pop())
}
