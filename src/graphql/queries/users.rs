use super::prelude::*;

#[derive(Default)]
pub struct UserQueries;

#[Object]
impl UserQueries {
    /// Get the current authenticated user, or null for anonymous callers
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(auth) = ctx.try_auth_user() else {
            return Ok(None);
        };
        let db = ctx.data_unchecked::<Database>();
        Ok(db
            .users()
            .get_by_id(&auth.uid)
            .await?
            .map(user_record_to_graphql))
    }

    /// List all users, newest first
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let db = ctx.data_unchecked::<Database>();
        let users = db.users().list_all().await?;
        Ok(users.into_iter().map(user_record_to_graphql).collect())
    }
}
