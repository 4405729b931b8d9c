//! Caller identity.
//!
//! Callers present the access token issued by the marketplace's identity provider as `Authorization: Bearer <token>`.
//! Tokens are HS256 JWTs whose `sub` claim is the user id. [`JwtIdentityProvider`] verifies the signature and expiry
//! with the shared JWT secret. Route handlers depend only on the [`IdentityProvider`] trait.
use actix_web::{http::header::AUTHORIZATION, HttpRequest};
use chrono::{DateTime, Utc};
use jwt_compact::{
    alg::{Hs256, Hs256Key},
    AlgorithmExt,
    Claims,
    Header,
    TimeOptions,
    UntrustedToken,
};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

/// The user a request is made on behalf of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string(), email: None, role: None }
    }
}

/// The claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Resolves a bearer token to a currently authenticated user.
    async fn resolve_user(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

pub struct JwtIdentityProvider {
    key: Option<Hs256Key>,
    time_options: TimeOptions,
}

impl JwtIdentityProvider {
    pub fn new(config: &AuthConfig) -> Self {
        let key = if config.jwt_secret.is_empty() {
            warn!("🔐️ No JWT secret is configured. All access tokens will be rejected.");
            None
        } else {
            Some(Hs256Key::new(config.jwt_secret.reveal().as_bytes()))
        };
        Self { key, time_options: TimeOptions::default() }
    }

    /// Issues an access token for `user`. The identity provider normally does this; the method exists for tooling
    /// and tests that share the secret.
    pub fn issue_token(&self, user: &AuthenticatedUser, expiry: DateTime<Utc>) -> Result<String, AuthError> {
        let key = self.key.as_ref().ok_or(AuthError::Unauthorized)?;
        let header = Header::empty().with_token_type("JWT");
        let mut claims =
            Claims::new(AccessClaims { sub: user.id.clone(), email: user.email.clone(), role: user.role.clone() });
        claims.issued_at = Some(Utc::now());
        claims.expiration = Some(expiry);
        Hs256.token(&header, &claims, key).map_err(|e| {
            warn!("🔐️ Could not sign access token. {e}");
            AuthError::Unauthorized
        })
    }
}

impl IdentityProvider for JwtIdentityProvider {
    async fn resolve_user(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let key = self.key.as_ref().ok_or(AuthError::Unauthorized)?;
        let untrusted = UntrustedToken::new(token).map_err(|e| {
            debug!("🔐️ Access token is malformed. {e}");
            AuthError::Unauthorized
        })?;
        let token = Hs256.validator::<AccessClaims>(key).validate(&untrusted).map_err(|e| {
            debug!("🔐️ Access token failed validation. {e}");
            AuthError::Unauthorized
        })?;
        let claims = token.claims();
        claims.validate_expiration(&self.time_options).map_err(|e| {
            debug!("🔐️ Access token rejected. {e}");
            AuthError::Unauthorized
        })?;
        let AccessClaims { sub, email, role } = claims.custom.clone();
        if sub.trim().is_empty() {
            debug!("🔐️ Access token has no subject");
            return Err(AuthError::Unauthorized);
        }
        trace!("🔐️ Access token resolved to user {sub}");
        Ok(AuthenticatedUser { id: sub, email, role })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingAuthHeader)?;
    let value = header.to_str().map_err(|_| AuthError::Unauthorized)?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => return Err(AuthError::Unauthorized),
    };
    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }
    Ok(token)
}
