//! Idempotent schema creation
//!
//! Tables are created at startup with CREATE TABLE IF NOT EXISTS rather than
//! versioned migration files; the schema is small enough that additive changes
//! land here directly.
//!
//! Referential integrity is deliberately not declared: rows may reference
//! users that no longer resolve, and read paths are expected to null-guard.

use anyhow::Result;
use sqlx::SqlitePool;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    surname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,
    dob TEXT NOT NULL,
    gender TEXT NOT NULL,
    friends TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
)
"#;

const CREATE_POSTS: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    author_id TEXT NOT NULL,
    content TEXT NOT NULL,
    image_url TEXT,
    image_urls TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL
)
"#;

const CREATE_COMMENTS: &str = r#"
CREATE TABLE IF NOT EXISTS comments (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    author_id TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

const CREATE_REACTIONS: &str = r#"
CREATE TABLE IF NOT EXISTS reactions (
    id TEXT PRIMARY KEY,
    post_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

const CREATE_FRIEND_REQUESTS: &str = r#"
CREATE TABLE IF NOT EXISTS friend_requests (
    id TEXT PRIMARY KEY,
    from_id TEXT NOT NULL,
    to_id TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
)
"#;

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_posts_author ON posts(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id)",
    "CREATE INDEX IF NOT EXISTS idx_reactions_post ON reactions(post_id)",
    // One reaction per (post, user) pair
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_reactions_post_user ON reactions(post_id, user_id)",
    "CREATE INDEX IF NOT EXISTS idx_friend_requests_to ON friend_requests(to_id, status)",
];

/// Create all tables and indexes if they do not already exist
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    for statement in [
        CREATE_USERS,
        CREATE_POSTS,
        CREATE_COMMENTS,
        CREATE_REACTIONS,
        CREATE_FRIEND_REQUESTS,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
