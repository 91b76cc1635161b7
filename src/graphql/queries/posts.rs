use super::prelude::*;

#[derive(Default)]
pub struct PostQueries;

#[Object]
impl PostQueries {
    /// List all posts, newest first
    async fn posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let db = ctx.data_unchecked::<Database>();
        let feed = ctx.data_unchecked::<FeedService>();

        let records = db.posts().list_all().await?;
        let views = feed.assemble_many(records).await?;
        Ok(views.into_iter().map(post_view_to_graphql).collect())
    }

    /// List the authenticated user's posts, newest first
    async fn my_posts(&self, ctx: &Context<'_>) -> Result<Vec<Post>> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let feed = ctx.data_unchecked::<FeedService>();

        let records = db.posts().list_by_author(&auth.uid).await?;
        let views = feed.assemble_many(records).await?;
        Ok(views.into_iter().map(post_view_to_graphql).collect())
    }
}
