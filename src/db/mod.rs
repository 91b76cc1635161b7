//! Database connection and repositories

pub mod comments;
pub mod friend_requests;
pub mod posts;
pub mod reactions;
pub mod schema;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub use comments::{CommentRecord, CommentsRepository};
pub use friend_requests::{
    FriendRequestRecord, FriendRequestsRepository, STATUS_ACCEPTED, STATUS_PENDING,
    STATUS_REJECTED,
};
pub use posts::{CreatePost, PostRecord, PostsRepository};
pub use reactions::{ReactionRecord, ReactionsRepository, ToggleOutcome};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the maximum connection pool size from environment or default
    fn get_max_connections() -> u32 {
        std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    }

    /// Create a new database connection pool, creating the file if missing
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(Self::get_max_connections())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables and indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Get a posts repository
    pub fn posts(&self) -> PostsRepository {
        PostsRepository::new(self.pool.clone())
    }

    /// Get a comments repository
    pub fn comments(&self) -> CommentsRepository {
        CommentsRepository::new(self.pool.clone())
    }

    /// Get a reactions repository
    pub fn reactions(&self) -> ReactionsRepository {
        ReactionsRepository::new(self.pool.clone())
    }

    /// Get a friend requests repository
    pub fn friend_requests(&self) -> FriendRequestsRepository {
        FriendRequestsRepository::new(self.pool.clone())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Fresh in-memory database with the full schema applied.
    ///
    /// The pool is capped at one connection: each in-memory SQLite
    /// connection holds its own private database, so a larger pool would
    /// hand out connections that never saw the schema.
    pub async fn memory_db() -> Database {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("sqlite url");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("in-memory sqlite");

        let db = Database { pool };
        db.ensure_schema().await.expect("schema");
        db
    }

    /// Insert a user with fixed password hash, for test fixtures
    pub async fn seed_user(db: &Database, first_name: &str, email: &str) -> UserRecord {
        db.users()
            .create(CreateUser {
                first_name: first_name.to_string(),
                surname: "Tester".to_string(),
                email: email.to_string(),
                password_hash: "x".to_string(),
                dob: "1990-01-01".to_string(),
                gender: "other".to_string(),
            })
            .await
            .expect("seed user")
    }

    /// Insert a plain text post for a user
    pub async fn seed_post(db: &Database, author_id: &str, content: &str) -> PostRecord {
        db.posts()
            .create(CreatePost {
                author_id: author_id.to_string(),
                content: content.to_string(),
                image_url: None,
                image_urls: vec![],
            })
            .await
            .expect("seed post")
    }
}
