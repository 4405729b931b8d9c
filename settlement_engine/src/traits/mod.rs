//! # Backend contracts
//!
//! This module defines the behaviour that a database backend must expose to act as the store for the settlement
//! engine.
//!
//! * [`InvoiceManagement`] is the Invoice State Store. It owns the only write path for the `pending → paid`
//!   transition, which must be a single conditional update so that concurrent or replayed verifications settle an
//!   invoice at most once.
//! * [`NotificationManagement`] is the Notification Sink: an append-only log of user-facing messages.
//! * [`SettlementDatabase`] bundles the two, and is what [`crate::InvoiceSettlementApi`] requires.
mod invoice_management;
mod notification_management;

pub use invoice_management::{InvoiceApiError, InvoiceManagement};
pub use notification_management::{NotificationApiError, NotificationManagement};

/// The highest level of behaviour for backends supporting the settlement engine.
pub trait SettlementDatabase: Clone + InvoiceManagement + NotificationManagement {}
