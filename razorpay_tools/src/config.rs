use log::*;
use settlement_common::Secret;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// The public key id. It is handed to the checkout widget, so it is not a secret.
    pub key_id: String,
    /// The shared secret used for basic auth against the REST API and for signing payment callbacks.
    pub key_secret: Secret<String>,
    pub api_url: String,
}

impl Default for RazorpayConfig {
    fn default() -> Self {
        Self { key_id: String::default(), key_secret: Secret::default(), api_url: DEFAULT_RAZORPAY_API_URL.into() }
    }
}

impl RazorpayConfig {
    pub fn new(key_id: &str, key_secret: &str) -> Self {
        Self { key_id: key_id.into(), key_secret: Secret::new(key_secret.into()), ..Default::default() }
    }

    pub fn new_from_env_or_default() -> Self {
        let key_id = std::env::var("RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("🪛️ RAZORPAY_KEY_ID not set. Gateway orders cannot be created.");
            String::default()
        });
        let key_secret = Secret::new(std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            error!(
                "🪛️ RAZORPAY_KEY_SECRET is not set. Payment verification requests will be rejected until it is \
                 configured."
            );
            String::default()
        }));
        let api_url = std::env::var("RSP_RAZORPAY_API_URL").unwrap_or_else(|_| DEFAULT_RAZORPAY_API_URL.into());
        Self { key_id, key_secret, api_url }
    }

    /// Payment verification only needs the shared secret.
    pub fn is_configured(&self) -> bool {
        !self.key_secret.is_empty()
    }
}
