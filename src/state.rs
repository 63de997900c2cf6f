//! Shared application state: the persistence context and the token verifier, passed to every handler.

use crate::auth::Authenticator;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(pool: PgPool, auth: Authenticator) -> Self {
        AppState {
            pool,
            auth: Arc::new(auth),
        }
    }
}
