//! Invoice Settlement Engine
//!
//! The settlement engine holds the logic for settling marketplace invoices (a customer paying a mechanic for a
//! completed roadside service) through the payment gateway. It is transport-agnostic: the HTTP server lives in the
//! `settlement_server` crate.
//!
//! The library is divided into these sections:
//! 1. Backend contracts ([`traits`]) and the SQLite implementation ([`SqliteDatabase`]). The public data types live in
//!    [`db_types`].
//! 2. The public API ([`InvoiceSettlementApi`]), which turns a verified gateway payment into a paid invoice and a pair
//!    of notifications, exactly once per invoice.
//! 3. Events ([`mod@events`]). An `InvoicePaidEvent` is emitted every time an invoice transitions to `paid`, so that
//!    other components can react without touching the settlement flow.

pub mod db_types;
pub mod events;
mod se_api;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use se_api::{
    errors::SettlementError,
    payment_objects::{PaymentProof, SettlementResult, VerifiedPayment},
    settlement_api::{InvoiceSettlementApi, NOTIFICATION_TYPE_PAYMENT},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
