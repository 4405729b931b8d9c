pub mod errors;
pub mod payment_objects;
pub mod settlement_api;
