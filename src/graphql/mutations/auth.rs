//! GraphQL authentication mutations
//!
//! signup and login require no authentication; login additionally sets the
//! HTTP-only `token` cookie through the request's CookieChange slot. logout
//! only clears that cookie, so an already-issued token stays valid until it
//! expires on its own.

use crate::graphql::auth::CookieChange;
use crate::services::SignupData;

use super::prelude::*;

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user account
    async fn signup(&self, ctx: &Context<'_>, input: SignupInput) -> Result<User> {
        let auth = ctx.data_unchecked::<AuthService>();

        let day = u32::try_from(input.day)
            .map_err(|_| async_graphql::Error::new("Invalid date of birth"))?;

        let user = auth
            .signup(SignupData {
                first_name: input.first_name,
                surname: input.surname,
                email: input.email,
                password: input.password,
                day,
                month: input.month,
                year: input.year,
                gender: input.gender,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user_record_to_graphql(user))
    }

    /// Authenticate with email and password.
    ///
    /// Returns the token in the payload and also sets it as an HTTP-only
    /// cookie on the response.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<AuthPayload> {
        let auth = ctx.data_unchecked::<AuthService>();

        let (user, token) = auth.login(&email, &password).await.map_err(|e| {
            tracing::warn!(email = %email, error = %e, "Login failed");
            e
        })?;

        if let Some(cookies) = ctx.data_opt::<CookieChange>() {
            cookies.set(token.clone(), auth.token_lifetime());
        }

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthPayload {
            token,
            user: user_record_to_graphql(user),
        })
    }

    /// Clear the auth cookie. Always returns true.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        if let Some(cookies) = ctx.data_opt::<CookieChange>() {
            cookies.clear();
        }
        Ok(true)
    }
}
