//! Bearer-token verification and permission checks.
//!
//! A request moves from no credential, to an unverified bearer token, to verified
//! [`Claims`] carrying a permission set, and is then either authorized for one
//! permission string or denied. Every failure is an [`AuthError`] and surfaces as 401.

pub mod permissions;

use crate::config::{AuthConfig, AuthKey};
use crate::error::ConfigError;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub use permissions::Permission;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingCredential,
    #[error("authorization header must be a bearer token")]
    MalformedHeader,
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("permission not found: {0}")]
    InsufficientPermission(String),
}

/// Token payload. `aud`, `iss` and `exp` are checked by the validator and not kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    /// Space-separated OAuth scopes; merged into the permission set.
    #[serde(default)]
    pub scope: Option<String>,
    pub exp: u64,
}

impl Claims {
    /// Every permission string granted by this credential.
    pub fn permission_set(&self) -> BTreeSet<&str> {
        let scopes = self.scope.as_deref().unwrap_or("").split_whitespace();
        self.permissions
            .iter()
            .map(String::as_str)
            .chain(scopes)
            .collect()
    }

    pub fn authorize(&self, permission: &str) -> Result<(), AuthError> {
        if self.permission_set().contains(permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermission(permission.to_string()))
        }
    }
}

/// Verifies bearer tokens against the configured key, issuer and audience.
#[derive(Clone)]
pub struct Authenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Authenticator {
    pub fn new(config: &AuthConfig) -> Result<Self, ConfigError> {
        let (decoding_key, algorithm) = match &config.key {
            AuthKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            AuthKey::RsaPem(pem) => {
                let key = DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(|e| ConfigError::Invalid {
                    key: "AUTH_PUBLIC_KEY_PEM",
                    reason: e.to_string(),
                })?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        let mut required = vec!["exp"];
        match &config.issuer {
            Some(iss) => {
                validation.set_issuer(&[iss]);
                required.push("iss");
            }
            None => tracing::warn!("AUTH_ISSUER not set; token issuer is not checked"),
        }
        match &config.audience {
            Some(aud) => {
                validation.set_audience(&[aud]);
                required.push("aud");
            }
            None => {
                validation.validate_aud = false;
                tracing::warn!("AUTH_AUDIENCE not set; token audience is not checked");
            }
        }
        validation.set_required_spec_claims(&required);

        Ok(Authenticator {
            decoding_key,
            validation,
        })
    }

    /// Check signature, expiry, issuer and audience; return the extracted claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }

    /// Verify the request's bearer token and require one permission.
    pub fn authorize(&self, headers: &HeaderMap, permission: &str) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token)?;
        claims.authorize(permission)?;
        Ok(claims)
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
