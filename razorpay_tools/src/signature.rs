//! Payment signature verification.
//!
//! When a checkout completes, the Razorpay widget hands the client three values: the order id (which we created),
//! the payment id (issued by Razorpay) and a signature. The signature is
//!
//! ```text
//! hex(HMAC-SHA256(key = key_secret, message = order_id + "|" + payment_id))
//! ```
//!
//! and is the only thing that proves the callback came from Razorpay. Neither the secret nor the expected signature
//! may ever be logged.
use hmac::{Hmac, Mac};
use log::trace;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Calculates the lowercase hex signature Razorpay produces for the given order and payment ids.
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    // HMAC accepts keys of any length; an empty result can never match a real signature
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return String::new();
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Returns true iff `signature` is exactly the expected signature for the order/payment pair. The comparison is
/// case-sensitive and runs in constant time for equal-length inputs.
pub fn verify_payment_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let expected = expected_signature(secret, order_id, payment_id);
    let expected = expected.as_bytes();
    let provided = signature.as_bytes();
    // The length of a SHA-256 hex digest is public knowledge
    if expected.len() != provided.len() {
        trace!("🔐️ Payment signature has the wrong length");
        return false;
    }
    expected.ct_eq(provided).into()
}
