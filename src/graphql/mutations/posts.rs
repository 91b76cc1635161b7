//! Post, comment, and reaction mutations
//!
//! Each mutation returns the post's fully reassembled read model so the
//! client can replace its cached copy in one step.

use async_graphql::Error;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::db::{CreatePost, PostRecord};

use super::prelude::*;

// Clients have been observed posting raw object ids into the comment field;
// a bare 24-hex string is treated as one of those and rejected.
static OBJECT_ID_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-f0-9]{24}$").expect("valid regex"));

#[derive(Default)]
pub struct PostMutations;

#[Object]
impl PostMutations {
    /// Create a new post
    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<Post> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let feed = ctx.data_unchecked::<FeedService>();

        let record = db
            .posts()
            .create(CreatePost {
                author_id: auth.uid.clone(),
                content: input.content,
                image_url: input.image_url,
                image_urls: input.image_urls.unwrap_or_default(),
            })
            .await?;

        tracing::info!(user_id = %auth.uid, post_id = %record.id, "Post created");
        assemble_post(feed, record).await
    }

    /// Add a comment to a post
    async fn add_comment(&self, ctx: &Context<'_>, input: AddCommentInput) -> Result<Post> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let feed = ctx.data_unchecked::<FeedService>();

        let content = validate_comment_content(&input.content, &input.post_id, &auth.uid)
            .map_err(Error::new)?;

        let post = db
            .posts()
            .get_by_id(&input.post_id)
            .await?
            .ok_or_else(|| Error::new("Post not found"))?;

        db.comments().create(&post.id, &auth.uid, content).await?;

        tracing::debug!(user_id = %auth.uid, post_id = %post.id, "Comment added");
        assemble_post(feed, post).await
    }

    /// Toggle the caller's reaction on a post
    async fn react_post(&self, ctx: &Context<'_>, input: ReactPostInput) -> Result<Post> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let feed = ctx.data_unchecked::<FeedService>();

        let post = db
            .posts()
            .get_by_id(&input.post_id)
            .await?
            .ok_or_else(|| Error::new("Post not found"))?;

        let outcome = db
            .reactions()
            .toggle(&post.id, &auth.uid, input.kind.as_str())
            .await?;

        tracing::debug!(
            user_id = %auth.uid,
            post_id = %post.id,
            kind = input.kind.as_str(),
            outcome = ?outcome,
            "Reaction toggled"
        );
        assemble_post(feed, post).await
    }
}

/// Reassemble a post's read model after a write, erroring if its author has
/// since become unresolvable
async fn assemble_post(feed: &FeedService, record: PostRecord) -> Result<Post> {
    let view = feed
        .assemble(record)
        .await?
        .ok_or_else(|| Error::new("Post not found"))?;
    Ok(post_view_to_graphql(view))
}

/// Validate addComment content, returning the trimmed text.
///
/// Rejects empty content, content echoing the post or caller id, and bare
/// object-id-like strings.
fn validate_comment_content<'a>(
    content: &'a str,
    post_id: &str,
    author_id: &str,
) -> std::result::Result<&'a str, &'static str> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Comment content is required");
    }
    if content == post_id || content == author_id || OBJECT_ID_LIKE.is_match(content) {
        return Err("Invalid comment content");
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_ID: &str = "post-1";
    const AUTHOR_ID: &str = "user-1";

    #[test]
    fn comment_validation_accepts_normal_content() {
        assert_eq!(
            validate_comment_content("nice post!", POST_ID, AUTHOR_ID),
            Ok("nice post!")
        );
        assert_eq!(
            validate_comment_content("  padded but real  ", POST_ID, AUTHOR_ID),
            Ok("padded but real")
        );
    }

    #[test]
    fn comment_validation_rejects_empty_and_whitespace() {
        assert_eq!(
            validate_comment_content("", POST_ID, AUTHOR_ID),
            Err("Comment content is required")
        );
        assert_eq!(
            validate_comment_content(" \n\t ", POST_ID, AUTHOR_ID),
            Err("Comment content is required")
        );
    }

    #[test]
    fn comment_validation_rejects_echoed_ids() {
        assert_eq!(
            validate_comment_content(POST_ID, POST_ID, AUTHOR_ID),
            Err("Invalid comment content")
        );
        assert_eq!(
            validate_comment_content(AUTHOR_ID, POST_ID, AUTHOR_ID),
            Err("Invalid comment content")
        );
    }

    #[test]
    fn comment_validation_rejects_object_id_like_strings() {
        assert_eq!(
            validate_comment_content("507f1f77bcf86cd799439011", POST_ID, AUTHOR_ID),
            Err("Invalid comment content")
        );
        assert_eq!(
            validate_comment_content("507F1F77BCF86CD799439011", POST_ID, AUTHOR_ID),
            Err("Invalid comment content")
        );

        // 24 chars but not all hex, or hex but not 24 chars: fine
        assert!(validate_comment_content("507f1f77bcf86cd79943901z", POST_ID, AUTHOR_ID).is_ok());
        assert!(validate_comment_content("abc123", POST_ID, AUTHOR_ID).is_ok());
    }
}
