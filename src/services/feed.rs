//! Post read-model assembly
//!
//! Joins a post with its author, ordered comments, ordered reactions, and a
//! per-kind reaction tally. Comments and reactions whose author/user row no
//! longer resolves are dropped: the store does not enforce referential
//! integrity, so read paths null-guard instead. The tally therefore sums to
//! the number of valid reactions, not the raw stored count.
//!
//! Read-only. Two queries per post plus user lookups (memoized per call);
//! listing N posts costs O(N) queries, no batching.

use std::collections::HashMap;

use anyhow::Result;

use crate::db::{CommentRecord, Database, PostRecord, ReactionRecord, UserRecord};

/// The six reaction kinds, in tally order
pub const REACTION_KINDS: [&str; 6] = ["like", "love", "haha", "wow", "sad", "angry"];

/// Per-kind reaction counts for a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactionTally {
    pub like: i32,
    pub love: i32,
    pub haha: i32,
    pub wow: i32,
    pub sad: i32,
    pub angry: i32,
}

impl ReactionTally {
    /// Tally reaction kinds, silently ignoring unrecognized ones
    pub fn count<'a>(kinds: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tally = Self::default();
        for kind in kinds {
            match kind {
                "like" => tally.like += 1,
                "love" => tally.love += 1,
                "haha" => tally.haha += 1,
                "wow" => tally.wow += 1,
                "sad" => tally.sad += 1,
                "angry" => tally.angry += 1,
                _ => {}
            }
        }
        tally
    }

    /// Sum of all six buckets
    pub fn total(&self) -> i32 {
        self.like + self.love + self.haha + self.wow + self.sad + self.angry
    }
}

/// A comment joined with its resolved author
#[derive(Debug, Clone)]
pub struct CommentView {
    pub comment: CommentRecord,
    pub author: UserRecord,
}

/// A reaction joined with its resolved user
#[derive(Debug, Clone)]
pub struct ReactionView {
    pub reaction: ReactionRecord,
    pub user: UserRecord,
}

/// Denormalized post shape returned to callers
#[derive(Debug, Clone)]
pub struct PostView {
    pub post: PostRecord,
    pub author: UserRecord,
    pub comments: Vec<CommentView>,
    pub reactions: Vec<ReactionView>,
    pub summary: ReactionTally,
}

/// Assembles post read models
#[derive(Clone)]
pub struct FeedService {
    db: Database,
}

impl FeedService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Assemble the read model for a single post.
    ///
    /// Returns `None` when the post's own author no longer resolves; such
    /// posts are dropped from listings rather than served half-populated.
    pub async fn assemble(&self, post: PostRecord) -> Result<Option<PostView>> {
        let mut users = UserCache::new(&self.db);

        let Some(author) = users.get(&post.author_id).await? else {
            tracing::warn!(post_id = %post.id, author_id = %post.author_id, "Dropping post with unresolvable author");
            return Ok(None);
        };

        let mut comments = Vec::new();
        for comment in self.db.comments().list_for_post(&post.id).await? {
            match users.get(&comment.author_id).await? {
                Some(author) => comments.push(CommentView { comment, author }),
                None => {
                    tracing::debug!(comment_id = %comment.id, "Skipping comment with unresolvable author");
                }
            }
        }

        let mut reactions = Vec::new();
        for reaction in self.db.reactions().list_for_post(&post.id).await? {
            match users.get(&reaction.user_id).await? {
                Some(user) => reactions.push(ReactionView { reaction, user }),
                None => {
                    tracing::debug!(reaction_id = %reaction.id, "Skipping reaction with unresolvable user");
                }
            }
        }

        let summary = ReactionTally::count(reactions.iter().map(|r| r.reaction.kind.as_str()));

        Ok(Some(PostView {
            post,
            author,
            comments,
            reactions,
            summary,
        }))
    }

    /// Assemble read models for a list of posts, preserving order
    pub async fn assemble_many(&self, posts: Vec<PostRecord>) -> Result<Vec<PostView>> {
        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            if let Some(view) = self.assemble(post).await? {
                views.push(view);
            }
        }
        Ok(views)
    }
}

/// Per-assembly memo of user lookups
struct UserCache<'a> {
    db: &'a Database,
    cache: HashMap<String, Option<UserRecord>>,
}

impl<'a> UserCache<'a> {
    fn new(db: &'a Database) -> Self {
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    async fn get(&mut self, id: &str) -> Result<Option<UserRecord>> {
        if let Some(hit) = self.cache.get(id) {
            return Ok(hit.clone());
        }
        let user = self.db.users().get_by_id(id).await?;
        self.cache.insert(id.to_string(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_post, seed_user};
    use pretty_assertions::assert_eq;

    #[test]
    fn tally_counts_each_kind_and_ignores_unknown() {
        let tally = ReactionTally::count(["like", "love", "like", "mystery", "angry"]);
        assert_eq!(tally.like, 2);
        assert_eq!(tally.love, 1);
        assert_eq!(tally.angry, 1);
        assert_eq!(tally.wow, 0);
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn tally_of_nothing_is_zero() {
        assert_eq!(ReactionTally::count([]), ReactionTally::default());
    }

    #[tokio::test]
    async fn assemble_orders_comments_ascending_and_reactions_descending() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let post = seed_post(&db, &alice.id, "hello").await;

        db.comments()
            .create(&post.id, &alice.id, "first")
            .await
            .unwrap();
        db.comments()
            .create(&post.id, &bob.id, "second")
            .await
            .unwrap();
        db.reactions()
            .insert(&post.id, &alice.id, "like")
            .await
            .unwrap();
        db.reactions()
            .insert(&post.id, &bob.id, "wow")
            .await
            .unwrap();

        let view = FeedService::new(db)
            .assemble(post)
            .await
            .unwrap()
            .expect("post view");

        let contents: Vec<&str> = view
            .comments
            .iter()
            .map(|c| c.comment.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_eq!(view.summary.like, 1);
        assert_eq!(view.summary.wow, 1);
    }

    #[tokio::test]
    async fn tally_counts_only_resolvable_reactions() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let post = seed_post(&db, &alice.id, "hello").await;

        db.reactions()
            .insert(&post.id, &alice.id, "love")
            .await
            .unwrap();
        // A reaction whose user row was never created
        db.reactions()
            .insert(&post.id, "ghost-user", "love")
            .await
            .unwrap();

        let raw = db.reactions().list_for_post(&post.id).await.unwrap();
        assert_eq!(raw.len(), 2);

        let view = FeedService::new(db)
            .assemble(post)
            .await
            .unwrap()
            .expect("post view");

        assert_eq!(view.reactions.len(), 1);
        assert_eq!(view.summary.love, 1);
        assert_eq!(view.summary.total(), view.reactions.len() as i32);
    }

    #[tokio::test]
    async fn comments_with_unresolvable_authors_are_dropped() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let post = seed_post(&db, &alice.id, "hello").await;

        db.comments()
            .create(&post.id, &alice.id, "kept")
            .await
            .unwrap();
        db.comments()
            .create(&post.id, "ghost-user", "dropped")
            .await
            .unwrap();

        let view = FeedService::new(db)
            .assemble(post)
            .await
            .unwrap()
            .expect("post view");

        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].comment.content, "kept");
    }

    #[tokio::test]
    async fn posts_with_unresolvable_author_are_dropped_from_listings() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        seed_post(&db, &alice.id, "kept").await;
        seed_post(&db, "ghost-user", "orphan").await;

        let posts = db.posts().list_all().await.unwrap();
        assert_eq!(posts.len(), 2);

        let views = FeedService::new(db).assemble_many(posts).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].post.content, "kept");
    }
}
