//! Require a verified bearer token carrying permission `P` before the handler runs.

use crate::auth::{Claims, Permission};
use crate::error::AppError;
use crate::state::AppState;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

/// Extractor for claims that passed verification and hold `P::NAME`.
#[derive(Debug, Clone)]
pub struct Authorized<P> {
    pub claims: Claims,
    _permission: PhantomData<P>,
}

#[async_trait]
impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: Permission,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = state.auth.authorize(&parts.headers, P::NAME)?;
        tracing::debug!(sub = ?claims.sub, permission = P::NAME, "authorized");
        Ok(Authorized {
            claims,
            _permission: PhantomData,
        })
    }
}
