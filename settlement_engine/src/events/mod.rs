//! Invoice settlement events.
//!
//! Components that want to react to a settled invoice (receipts, payouts to the mechanic, analytics) register a hook
//! in [`EventHooks`]. The settlement API publishes an [`InvoicePaidEvent`] once per `pending → paid` transition.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
