//! GraphQL authentication context
//!
//! The HTTP layer verifies the `token` cookie and, when valid, injects an
//! `AuthUser` into the request's GraphQL data. Resolvers requiring identity
//! call `ctx.auth_user()?`; `me` uses `try_auth_user` and returns null for
//! anonymous or stale-token callers instead of erroring.
//!
//! Cookie writes flow the other way: login/logout record a `CookieUpdate` in
//! the per-request `CookieChange` slot and the HTTP handler applies it to the
//! response jar after execution.

use std::sync::{Arc, Mutex};

use async_graphql::{Context, ErrorExtensions, Result};

use crate::services::auth;

/// Name of the HTTP-only cookie carrying the auth token
pub const AUTH_COOKIE: &str = "token";

/// User identity extracted from a verified token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
}

/// Verify a cookie token and produce the GraphQL auth context
pub fn verify_token(token: &str, secret: &str) -> anyhow::Result<AuthUser> {
    let claims = auth::verify_token(token, secret)?;
    Ok(AuthUser { uid: claims.uid })
}

/// Extension trait to get the authenticated user from the GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or return an error if not authenticated
    fn auth_user(&self) -> Result<&AuthUser>;

    /// Get the authenticated user if present, or None
    fn try_auth_user(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>().ok_or_else(|| {
            async_graphql::Error::new("Not authenticated")
                .extend_with(|_, e| e.set("code", "UNAUTHORIZED"))
        })
    }

    fn try_auth_user(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}

/// A pending change to the auth cookie
#[derive(Debug, Clone)]
pub enum CookieUpdate {
    /// Set the cookie to this token with the given max-age in seconds
    Set { token: String, max_age_secs: i64 },
    /// Clear the cookie
    Clear,
}

/// Per-request slot resolvers use to request an auth cookie change
#[derive(Clone, Default)]
pub struct CookieChange(Arc<Mutex<Option<CookieUpdate>>>);

impl CookieChange {
    pub fn set(&self, token: String, max_age_secs: i64) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(CookieUpdate::Set {
                token,
                max_age_secs,
            });
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(CookieUpdate::Clear);
        }
    }

    /// Take the pending update, leaving the slot empty
    pub fn take(&self) -> Option<CookieUpdate> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}
