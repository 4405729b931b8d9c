//! # Settlement server
//! This crate hosts the HTTP server for invoice settlement. It is responsible for:
//! * Creating gateway orders for pending invoices.
//! * Verifying the signed payment proof returned by the checkout widget, marking the invoice as paid exactly once,
//!   and notifying the mechanic and the customer.
//! * Listing a user's notifications.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/verify-razorpay-payment`: Verifies a payment and settles the invoice.
//! * `/create-razorpay-order`: Creates a gateway order for an invoice.
//! * `/notifications`: The caller's notifications, newest first.
//!
//! Every route answers CORS preflight (`OPTIONS`) requests.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
