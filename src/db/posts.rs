//! Posts repository
//!
//! Posts are immutable after creation; comments and reactions live in their
//! own tables and are joined at read time by the feed service.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::sqlite_helpers::{json_to_vec, now_iso8601, vec_to_json};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct CreatePost {
    pub author_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
}

type PostRow = (String, String, String, Option<String>, String, String);

fn row_to_record(r: PostRow) -> PostRecord {
    PostRecord {
        id: r.0,
        author_id: r.1,
        content: r.2,
        image_url: r.3,
        image_urls: json_to_vec(&r.4),
        created_at: r.5,
    }
}

const POST_COLUMNS: &str = "id, author_id, content, image_url, image_urls, created_at";

pub struct PostsRepository {
    pool: SqlitePool,
}

impl PostsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new post
    pub async fn create(&self, post: CreatePost) -> Result<PostRecord> {
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, content, image_url, image_urls, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&post.author_id)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(vec_to_json(&post.image_urls))
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to create post"))
    }

    /// Get a post by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Option<PostRecord>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_record))
    }

    /// List all posts, newest first
    pub async fn list_all(&self) -> Result<Vec<PostRecord>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }

    /// List posts by a single author, newest first
    pub async fn list_by_author(&self, author_id: &str) -> Result<Vec<PostRecord>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE author_id = ? ORDER BY created_at DESC"
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_record).collect())
    }
}
