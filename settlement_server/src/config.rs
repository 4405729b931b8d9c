use std::env;

use log::*;
use razorpay_tools::RazorpayConfig;
use settlement_common::{helpers::parse_boolean_flag, Secret};

use crate::errors::ServerError;

const DEFAULT_RSP_HOST: &str = "127.0.0.1";
const DEFAULT_RSP_PORT: u16 = 8370;
const DEFAULT_RSP_DATABASE_URL: &str = "sqlite://data/rsp.db";
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "*";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Gateway credentials. The key secret doubles as the signing key for payment callbacks.
    pub razorpay: RazorpayConfig,
    /// When true, a payment only settles the invoice that its gateway order was created for. When false, the
    /// `invoice_id` supplied by the caller is trusted as long as the signature is valid.
    pub strict_order_binding: bool,
    pub cors_allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RSP_HOST.to_string(),
            port: DEFAULT_RSP_PORT,
            database_url: DEFAULT_RSP_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            razorpay: RazorpayConfig::default(),
            strict_order_binding: true,
            cors_allowed_origin: DEFAULT_CORS_ALLOWED_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RSP_HOST").ok().unwrap_or_else(|| DEFAULT_RSP_HOST.into());
        let port = env::var("RSP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RSP_PORT. {e} Using the default, {DEFAULT_RSP_PORT}, instead."
                    );
                    DEFAULT_RSP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RSP_PORT);
        let database_url = env::var("RSP_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ RSP_DATABASE_URL is not set. Using the default, {DEFAULT_RSP_DATABASE_URL}.");
            DEFAULT_RSP_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Every \
                 authenticated request will be rejected."
            );
            AuthConfig::default()
        });
        let razorpay = RazorpayConfig::new_from_env_or_default();
        let strict_order_binding = parse_boolean_flag(env::var("RSP_STRICT_ORDER_BINDING").ok(), true);
        if !strict_order_binding {
            warn!(
                "🚨️ Strict order binding is disabled. A valid payment signature can settle any invoice named by the \
                 caller."
            );
        }
        let cors_allowed_origin =
            env::var("RSP_CORS_ALLOWED_ORIGIN").ok().unwrap_or_else(|| DEFAULT_CORS_ALLOWED_ORIGIN.into());
        Self { host, port, database_url, auth, razorpay, strict_order_binding, cors_allowed_origin }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    /// The HS256 secret that user access tokens are signed with. It is shared with the identity provider that issues
    /// the tokens.
    pub jwt_secret: Secret<String>,
}

impl AuthConfig {
    pub fn new(jwt_secret: &str) -> Self {
        Self { jwt_secret: Secret::new(jwt_secret.to_string()) }
    }

    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("RSP_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [RSP_JWT_SECRET]")))?;
        if secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("RSP_JWT_SECRET is empty".to_string()));
        }
        Ok(Self::new(&secret))
    }
}
