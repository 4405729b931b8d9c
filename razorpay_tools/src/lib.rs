//! Razorpay tools
//!
//! Thin client-side helpers for the Razorpay payment gateway:
//! * [`signature`] verifies the `razorpay_signature` returned by the checkout widget after a successful charge.
//! * [`RazorpayApi`] talks to the Razorpay REST API to create orders for invoices.
mod api;
mod config;
mod data_objects;
mod error;
mod gateway;
pub mod signature;

pub use api::RazorpayApi;
pub use config::RazorpayConfig;
pub use data_objects::{NewRazorpayOrder, RazorpayOrder};
pub use error::RazorpayApiError;
pub use gateway::PaymentGateway;
